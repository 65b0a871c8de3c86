//! Persistence module split across logical submodules.

mod books;
mod error;
mod file;

pub use books::{add_book, calculate_statistics, random_book, remove_book, search_books};
pub use error::StoreError;
pub use file::{load_library, save_library, LibraryFile, DEFAULT_LIBRARY_FILE};
