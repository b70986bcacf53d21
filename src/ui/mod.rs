//! Ratatui front-end: one table-grid screen with an import dialog and an
//! export report layered on top as modes.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
