mod app;
mod config;
mod effects;
mod render;
mod timer;

pub use app::run_app;
