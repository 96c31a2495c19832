use crate::{CarouselState, ItemId, LoadStatus, Position};

pub const LOADING_MESSAGE: &str = "Nachrichten werden geladen...";
pub const EMPTY_MESSAGE: &str = "Keine Nachrichten gefunden.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselStatus {
    Loading,
    Empty,
    Error(String),
    Ready,
}

impl CarouselStatus {
    /// Text shown in place of the slides, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            CarouselStatus::Loading => Some(LOADING_MESSAGE.to_string()),
            CarouselStatus::Empty => Some(EMPTY_MESSAGE.to_string()),
            CarouselStatus::Error(reason) => Some(format!("{EMPTY_MESSAGE} {reason}")),
            CarouselStatus::Ready => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideView {
    pub item_id: ItemId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub page_url: String,
    /// Day-first date, e.g. `03.07.2025`.
    pub published: String,
    pub position: Position,
    pub slide_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotView {
    pub index: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselViewModel {
    pub title: String,
    pub status: CarouselStatus,
    pub slides: Vec<SlideView>,
    pub dots: Vec<DotView>,
    pub is_paused: bool,
    pub show_arrows: bool,
}

pub(crate) fn build(state: &CarouselState) -> CarouselViewModel {
    let status = match state.load_status() {
        LoadStatus::Loading => CarouselStatus::Loading,
        LoadStatus::Failed(reason) => CarouselStatus::Error(reason.clone()),
        LoadStatus::Ready if state.items().is_empty() => CarouselStatus::Empty,
        LoadStatus::Ready => CarouselStatus::Ready,
    };

    let slides = state
        .visible_slides()
        .into_iter()
        .map(|slide| SlideView {
            item_id: slide.item.id,
            title: slide.item.title.clone(),
            description: slide.item.description.clone(),
            image_url: slide.item.image_url.clone(),
            page_url: slide.item.page_url.clone(),
            published: slide.item.published_date.format("%d.%m.%Y").to_string(),
            position: slide.position,
            slide_index: slide.slide_index,
        })
        .collect();

    let dots = (0..state.items().len())
        .map(|index| DotView {
            index,
            active: index == state.current_index(),
        })
        .collect();

    CarouselViewModel {
        title: state.settings().title.clone(),
        status,
        slides,
        dots,
        is_paused: state.is_paused(),
        show_arrows: state.settings().show_arrows,
    }
}
