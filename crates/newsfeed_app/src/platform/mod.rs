//! Terminal front end: configuration, logging, intent parsing and rendering
//! around the pure core.
mod app;
mod config;
mod effects;
mod input;
mod logging;
mod render;

pub use app::run_app;
