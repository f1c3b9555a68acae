//! Ratatui front-end: a chapter list with search and a chapter detail view
//! with per-verse playback.

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
