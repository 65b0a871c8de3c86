//! Ratatui front-end for the book catalog. It is a thin caller of the store:
//! every page reloads the library from disk, runs one store operation, and
//! renders the result.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
