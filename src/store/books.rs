use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::models::{Book, LibraryStats};

use super::{save_library, LibraryFile, StoreError};

/// Append a book and persist the whole library. Duplicates are accepted.
///
/// If the write fails the book is taken back out, so `library` still matches
/// the file.
pub fn add_book(file: &LibraryFile, library: &mut Vec<Book>, book: Book) -> Result<(), StoreError> {
    info!(title = %book.title, author = %book.author, "adding book");
    library.push(book);
    if let Err(err) = save_library(file, library) {
        library.pop();
        return Err(err);
    }
    Ok(())
}

/// Remove the first book whose title matches case-insensitively.
///
/// Only one record goes per call even when several share a title. Returns
/// `Ok(false)` without touching the file when nothing matches. A failed write
/// puts the book back at its old position.
pub fn remove_book(
    file: &LibraryFile,
    library: &mut Vec<Book>,
    title: &str,
) -> Result<bool, StoreError> {
    let Some(index) = library.iter().position(|book| book.has_title(title)) else {
        debug!(title, "no book to remove");
        return Ok(false);
    };

    let removed = library.remove(index);
    if let Err(err) = save_library(file, library) {
        library.insert(index, removed);
        return Err(err);
    }
    info!(title = %removed.title, index, "removed book");
    Ok(true)
}

/// Books whose title or author contains `query`, ignoring case, in library
/// order. An empty query matches everything.
pub fn search_books(library: &[Book], query: &str) -> Vec<Book> {
    let needle = query.to_lowercase();
    let results: Vec<Book> = library
        .iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&needle)
                || book.author.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    debug!(query, matches = results.len(), "searched library");
    results
}

pub fn calculate_statistics(library: &[Book]) -> LibraryStats {
    let total = library.len();
    let read = library.iter().filter(|book| book.read).count();
    let read_percentage = if total > 0 {
        read as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    LibraryStats {
        total,
        read,
        read_percentage,
    }
}

/// Uniformly pick one book, or `None` for an empty library. The caller
/// supplies the random source.
pub fn random_book<'a, R>(library: &'a [Book], rng: &mut R) -> Option<&'a Book>
where
    R: Rng + ?Sized,
{
    library.choose(rng)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    use super::*;
    use crate::store::load_library;

    fn shelf() -> Vec<Book> {
        vec![
            Book::new("The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", true),
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
            Book::new("Emma", "Jane Austen", 1815, "Classic", false),
            Book::new("DUNE", "Someone Else", 2001, "Parody", false),
        ]
    }

    fn temp_file() -> (TempDir, LibraryFile) {
        let dir = TempDir::new().unwrap();
        let file = LibraryFile::new(dir.path().join("library.json"));
        (dir, file)
    }

    #[test]
    fn add_appends_and_persists() {
        let (_dir, file) = temp_file();
        let mut library = shelf();
        let before = library.len();
        let book = Book::new("Beloved", "Toni Morrison", 1987, "Fiction", false);

        add_book(&file, &mut library, book.clone()).unwrap();

        assert_eq!(library.len(), before + 1);
        assert_eq!(library.last(), Some(&book));
        assert_eq!(load_library(&file), library);
    }

    #[test]
    fn add_accepts_duplicates() {
        let (_dir, file) = temp_file();
        let mut library = Vec::new();
        let book = Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true);

        add_book(&file, &mut library, book.clone()).unwrap();
        add_book(&file, &mut library, book).unwrap();

        assert_eq!(load_library(&file).len(), 2);
    }

    #[test]
    fn remove_takes_only_first_match() {
        let (_dir, file) = temp_file();
        let mut library = shelf();

        assert!(remove_book(&file, &mut library, "dune").unwrap());

        assert_eq!(library.len(), 3);
        let remaining: Vec<&str> = library.iter().map(|b| b.author.as_str()).collect();
        assert_eq!(remaining, ["J.R.R. Tolkien", "Jane Austen", "Someone Else"]);
        assert_eq!(load_library(&file), library);
    }

    #[test]
    fn remove_missing_title_leaves_everything_alone() {
        let (_dir, file) = temp_file();
        let mut library = shelf();

        assert!(!remove_book(&file, &mut library, "nonexistent").unwrap());

        assert_eq!(library, shelf());
        assert!(!file.path().exists());
    }

    #[test]
    fn remove_requires_whole_title() {
        let (_dir, file) = temp_file();
        let mut library = shelf();
        assert!(!remove_book(&file, &mut library, "Hobb").unwrap());
    }

    fn blocked_file() -> (TempDir, LibraryFile) {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("library.json");
        fs::create_dir(&path).unwrap();
        (dir, LibraryFile::new(path))
    }

    #[test]
    fn failed_add_leaves_library_unchanged() {
        let (_dir, file) = blocked_file();
        let mut library = shelf();

        let result = add_book(
            &file,
            &mut library,
            Book::new("Beloved", "Toni Morrison", 1987, "Fiction", false),
        );

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(library, shelf());
        assert!(load_library(&file).is_empty());
    }

    #[test]
    fn failed_remove_restores_book_in_place() {
        let (_dir, file) = blocked_file();
        let mut library = shelf();

        let result = remove_book(&file, &mut library, "emma");

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(library, shelf());
    }

    #[test]
    fn search_ignores_case_on_author() {
        let results = search_books(&shelf(), "TOLKIEN");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "The Hobbit");
    }

    #[test]
    fn search_matches_title_substrings_in_order() {
        let results = search_books(&shelf(), "un");
        let titles: Vec<&str> = results.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Dune", "DUNE"]);
    }

    #[test]
    fn empty_query_matches_everything() {
        assert_eq!(search_books(&shelf(), ""), shelf());
    }

    #[test]
    fn search_without_hits_is_empty() {
        assert!(search_books(&shelf(), "tolstoy").is_empty());
    }

    #[test]
    fn statistics_of_empty_library() {
        let stats = calculate_statistics(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.read_percentage, 0.0);
    }

    #[test]
    fn statistics_half_read() {
        let stats = calculate_statistics(&shelf());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.read, 2);
        assert_eq!(stats.read_percentage, 50.0);
    }

    #[test]
    fn random_pick_on_empty_library() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_book(&[], &mut rng).is_none());
    }

    #[test]
    fn random_pick_eventually_visits_every_book() {
        let library = shelf();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            let book = random_book(&library, &mut rng).unwrap();
            seen.insert(book.author.clone());
        }

        assert_eq!(seen.len(), library.len());
    }
}
