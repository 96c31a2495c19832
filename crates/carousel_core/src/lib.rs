//! Carousel core: pure navigation state machine and view-model helpers.
mod effect;
mod error;
mod item;
mod msg;
mod settings;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::NavigationError;
pub use item::{DisplayItem, ItemId};
pub use msg::Msg;
pub use settings::CarouselSettings;
pub use state::{
    window_offsets, CarouselSnapshot, CarouselState, LoadStatus, Position, VisibleSlide, MAX_ITEMS,
};
pub use update::update;
pub use view_model::{
    CarouselStatus, CarouselViewModel, DotView, SlideView, EMPTY_MESSAGE, LOADING_MESSAGE,
};
