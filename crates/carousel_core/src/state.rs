use engine_logging::engine_debug;

use crate::view_model::{self, CarouselViewModel};
use crate::{CarouselSettings, DisplayItem, NavigationError};

/// Hard cap on the number of items the carousel holds.
pub const MAX_ITEMS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Prev,
    Current,
    Next,
}

impl Position {
    fn from_offset(offset: isize) -> Self {
        match offset {
            -1 => Position::Prev,
            1 => Position::Next,
            _ => Position::Current,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Prev => "prev",
            Position::Current => "current",
            Position::Next => "next",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleSlide<'a> {
    pub item: &'a DisplayItem,
    pub position: Position,
    pub slide_index: usize,
}

/// Relative offsets of the visible window for a list of `len` items.
pub fn window_offsets(len: usize) -> &'static [isize] {
    match len {
        0 => &[],
        1 => &[0],
        2 => &[0, 1],
        _ => &[-1, 0, 1],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselSnapshot {
    pub items: Vec<DisplayItem>,
    pub current_index: usize,
    pub is_paused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselState {
    settings: CarouselSettings,
    items: Vec<DisplayItem>,
    current_index: usize,
    is_paused: bool,
    load: LoadStatus,
    disposed: bool,
    dirty: bool,
}

impl Default for CarouselState {
    fn default() -> Self {
        Self::new(CarouselSettings::default())
    }
}

impl CarouselState {
    /// Empty carousel. Starts paused unless the host enabled auto-play.
    pub fn new(settings: CarouselSettings) -> Self {
        let is_paused = !settings.auto_play;
        Self {
            settings,
            items: Vec::new(),
            current_index: 0,
            is_paused,
            load: LoadStatus::Loading,
            disposed: false,
            dirty: false,
        }
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_item(&self) -> Option<&DisplayItem> {
        self.items.get(self.current_index)
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            items: self.items.clone(),
            current_index: self.current_index,
            is_paused: self.is_paused,
        }
    }

    pub fn view(&self) -> CarouselViewModel {
        view_model::build(self)
    }

    /// Replaces the item list, keeping at most [`MAX_ITEMS`], and rewinds to
    /// the first slide.
    pub fn load_items(&mut self, mut items: Vec<DisplayItem>) {
        if items.len() > MAX_ITEMS {
            engine_debug!("Truncating {} items to {}", items.len(), MAX_ITEMS);
            items.truncate(MAX_ITEMS);
        }
        self.items = items;
        self.current_index = 0;
        self.mark_dirty();
    }

    pub fn advance(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.current_index = (self.current_index + 1) % len;
        self.mark_dirty();
    }

    pub fn retreat(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.current_index = (self.current_index + len - 1) % len;
        self.mark_dirty();
    }

    /// Jumps to `index`. Out-of-range indices are rejected, never clamped.
    pub fn go_to(&mut self, index: usize) -> Result<(), NavigationError> {
        let len = self.items.len();
        if index >= len {
            return Err(NavigationError::OutOfRange { index, len });
        }
        if self.current_index != index {
            self.current_index = index;
            self.mark_dirty();
        }
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
        self.mark_dirty();
    }

    /// The (up to three) slides eligible for display around the current one.
    pub fn visible_slides(&self) -> Vec<VisibleSlide<'_>> {
        let len = self.items.len();
        window_offsets(len)
            .iter()
            .map(|&offset| {
                let slide_index =
                    (self.current_index as isize + offset).rem_euclid(len as isize) as usize;
                VisibleSlide {
                    item: &self.items[slide_index],
                    position: Position::from_offset(offset),
                    slide_index,
                }
            })
            .collect()
    }

    /// Returns whether a re-render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_load_status(&mut self, load: LoadStatus) {
        self.load = load;
        self.mark_dirty();
    }

    pub(crate) fn dispose(&mut self) {
        self.disposed = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
