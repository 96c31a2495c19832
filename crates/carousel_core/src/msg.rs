use crate::DisplayItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Fetch and normalization finished; replaces the item list.
    ItemsLoaded(Vec<DisplayItem>),
    /// No source could be read. Carries a plain-language reason.
    LoadFailed(String),
    /// User clicked the right arrow.
    NextClicked,
    /// User clicked the left arrow.
    PrevClicked,
    /// User clicked a navigation dot.
    DotClicked(usize),
    /// User clicked a visible slide. Selects it, or opens it when it is
    /// already the current one.
    SlideClicked(usize),
    /// User clicked play/pause.
    TogglePauseClicked,
    /// Auto-advance timer tick.
    TimerFired,
    /// Host is tearing the widget down.
    Teardown,
    /// Fallback for placeholder wiring.
    NoOp,
}
