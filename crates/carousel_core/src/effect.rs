use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// (Re)start the auto-advance timer with the given period.
    ArmTimer { interval: Duration },
    /// Stop the auto-advance timer if it is running.
    DisarmTimer,
    /// Open the page behind the current slide.
    OpenPage { url: String },
}
