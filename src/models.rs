//! Domain models that mirror the JSON storage file and get passed throughout
//! the TUI. These types stay light-weight data holders so the store can focus
//! on persistence and the UI on presentation.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry in the catalog. The field names double as the JSON keys in the
/// storage file, so renaming a field is a breaking change for existing data.
pub struct Book {
    /// Title shown in lists. Also the only identity a book has: removal and
    /// search compare it case-insensitively.
    pub title: String,
    /// Author field used both for display and filtering.
    pub author: String,
    /// Publication year. The add form limits it to 0..=2100; the store accepts
    /// whatever the file contains.
    pub year: i32,
    pub genre: String,
    /// Whether the book has been read.
    pub read: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    /// Short read/unread marker rendered next to every listed book.
    pub fn status_tag(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }

    /// Case-insensitive title comparison used by removal.
    pub fn has_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }
}

impl fmt::Display for Book {
    /// `Title by Author (Year) - Genre - Status`, the single-line form used by
    /// the collection view and search results.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.status_tag()
        )
    }
}

/// Aggregate numbers shown on the statistics screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LibraryStats {
    pub total: usize,
    pub read: usize,
    /// `read / total * 100`, or zero for an empty library.
    pub read_percentage: f64,
}

impl LibraryStats {
    /// Fraction in `0.0..=1.0`, ready for a gauge widget.
    pub fn read_ratio(&self) -> f64 {
        (self.read_percentage / 100.0).clamp(0.0, 1.0)
    }
}
