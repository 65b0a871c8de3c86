use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::models::Book;

use super::StoreError;

/// File name used when no explicit path is configured. Resolved relative to
/// the working directory.
pub const DEFAULT_LIBRARY_FILE: &str = "library_data.json";

/// Handle to the JSON file backing the library. Every store operation takes
/// one by reference, the same way queries take a database connection. It holds
/// no cached data: the file on disk stays the only owner of the books.
#[derive(Debug, Clone)]
pub struct LibraryFile {
    path: PathBuf,
}

impl LibraryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for LibraryFile {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY_FILE)
    }
}

/// Read every book from disk in stored order.
///
/// A missing file is the normal state of a fresh install, and an unparsable
/// one is logged and otherwise ignored; both yield an empty library.
pub fn load_library(file: &LibraryFile) -> Vec<Book> {
    let raw = match fs::read_to_string(file.path()) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %file.path().display(), "library file not found, starting empty");
            return Vec::new();
        }
        Err(err) => {
            warn!(path = %file.path().display(), error = %err, "failed to read library file");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Book>>(&raw) {
        Ok(books) => {
            debug!(path = %file.path().display(), count = books.len(), "loaded library");
            books
        }
        Err(err) => {
            warn!(path = %file.path().display(), error = %err, "library file is malformed, ignoring it");
            Vec::new()
        }
    }
}

/// Overwrite the storage file with the full library.
///
/// There is no locking: two processes saving the same file race and the last
/// write wins.
pub fn save_library(file: &LibraryFile, books: &[Book]) -> Result<(), StoreError> {
    let path = file.path();
    let encoded = encode(books)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, encoded).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), count = books.len(), "saved library");
    Ok(())
}

/// Pretty-print with four-space indentation so the file stays easy to edit by
/// hand.
fn encode(books: &[Book]) -> Result<Vec<u8>, StoreError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    books.serialize(&mut serializer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn sample() -> Vec<Book> {
        vec![
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
            Book::new("Emma", "Jane Austen", 1815, "Classic", false),
        ]
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let file = LibraryFile::new(dir.path().join("absent.json"));
        assert!(load_library(&file).is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_library(&LibraryFile::new(path)).is_empty());
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, r#"[{"title": "Dune"}]"#).unwrap();
        assert!(load_library(&LibraryFile::new(path)).is_empty());
    }

    #[test]
    fn unreadable_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();
        assert!(load_library(&LibraryFile::new(path)).is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let file = LibraryFile::new(dir.path().join("library.json"));
        let books = sample();

        save_library(&file, &books).unwrap();
        assert_eq!(load_library(&file), books);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let file = LibraryFile::new(dir.path().join("library.json"));

        save_library(&file, &sample()).unwrap();
        save_library(&file, &sample()[..1]).unwrap();

        assert_eq!(load_library(&file).len(), 1);
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let file = LibraryFile::new(dir.path().join("nested").join("library.json"));

        save_library(&file, &sample()).unwrap();
        assert!(file.path().exists());
    }

    #[test]
    fn saved_file_uses_four_space_indent() {
        let dir = TempDir::new().unwrap();
        let file = LibraryFile::new(dir.path().join("library.json"));

        save_library(&file, &sample()).unwrap();
        let raw = fs::read_to_string(file.path()).unwrap();
        assert!(raw.starts_with("[\n    {\n        \"title\": \"Dune\""));
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail.
        let file = LibraryFile::new(dir.path());

        let err = save_library(&file, &sample()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
