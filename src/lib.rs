//! Core library surface for the book catalog TUI application.
//!
//! The store is usable on its own; the `ui` module is only one caller of it.
pub mod config;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// The record type and its aggregate.
pub use models::{Book, LibraryStats};

/// Load/save and the catalog operations.
pub use store::{
    add_book, calculate_statistics, load_library, random_book, remove_book, save_library,
    search_books, LibraryFile, StoreError,
};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
