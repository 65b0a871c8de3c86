//! Tests for the public store API
//!
//! These tests verify:
//! - A full load/mutate/save cycle against a real file
//! - Fail-soft loading of missing and malformed files
//! - Removal and search semantics across reloads
//! - Statistics and random picks on loaded data

use std::fs;
use std::path::PathBuf;

use book_catalog::{
    add_book, calculate_statistics, load_library, random_book, remove_book, save_library,
    search_books, Book, LibraryFile, StoreError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_library() -> (TempDir, LibraryFile) {
    let temp_dir = TempDir::new().unwrap();
    let file = LibraryFile::new(temp_dir.path().join("library_data.json"));
    (temp_dir, file)
}

fn sample_books() -> Vec<Book> {
    vec![
        Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
        Book::new("The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", true),
        Book::new("dune", "Brian Herbert", 1999, "Sci-Fi", false),
        Book::new("Emma", "Jane Austen", 1815, "Classic", false),
    ]
}

// =============================================================================
// Load/Save Tests
// =============================================================================

#[test]
fn test_round_trip_preserves_every_field() {
    let (_temp, file) = setup_temp_library();
    let books = sample_books();

    save_library(&file, &books).unwrap();
    let loaded = load_library(&file);
    save_library(&file, &loaded).unwrap();

    assert_eq!(load_library(&file), books);
}

#[test]
fn test_missing_file_is_empty_library() {
    let (_temp, file) = setup_temp_library();
    assert!(load_library(&file).is_empty());
}

#[test]
fn test_malformed_file_is_empty_library() {
    let (_temp, file) = setup_temp_library();
    fs::write(file.path(), "[{\"title\": ").unwrap();
    assert!(load_library(&file).is_empty());
}

#[test]
fn test_reads_hand_written_file() {
    let (_temp, file) = setup_temp_library();
    fs::write(
        file.path(),
        r#"[
    {"title": "Beloved", "author": "Toni Morrison", "year": 1987, "genre": "Fiction", "read": true}
]"#,
    )
    .unwrap();

    let books = load_library(&file);
    assert_eq!(
        books,
        vec![Book::new("Beloved", "Toni Morrison", 1987, "Fiction", true)]
    );
}

#[test]
fn test_default_path() {
    assert_eq!(
        LibraryFile::default().path(),
        PathBuf::from("library_data.json").as_path()
    );
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[test]
fn test_add_survives_reload() {
    let (_temp, file) = setup_temp_library();

    let mut library = load_library(&file);
    add_book(
        &file,
        &mut library,
        Book::new("Emma", "Jane Austen", 1815, "Classic", false),
    )
    .unwrap();

    let mut reloaded = load_library(&file);
    assert_eq!(reloaded.len(), 1);

    add_book(
        &file,
        &mut reloaded,
        Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
    )
    .unwrap();

    let titles: Vec<String> = load_library(&file).into_iter().map(|b| b.title).collect();
    assert_eq!(titles, ["Emma", "Dune"]);
}

#[test]
fn test_remove_one_duplicate_per_call() {
    let (_temp, file) = setup_temp_library();
    save_library(&file, &sample_books()).unwrap();

    let mut library = load_library(&file);
    assert!(remove_book(&file, &mut library, "DUNE").unwrap());
    let after_first = load_library(&file);
    assert_eq!(after_first.len(), 3);
    assert_eq!(after_first[1].author, "Brian Herbert");

    let mut library = after_first;
    assert!(remove_book(&file, &mut library, "DUNE").unwrap());
    assert_eq!(load_library(&file).len(), 2);

    assert!(!remove_book(&file, &mut library, "DUNE").unwrap());
    assert_eq!(load_library(&file).len(), 2);
}

#[test]
fn test_failed_remove_leaves_file_untouched() {
    let (_temp, file) = setup_temp_library();
    save_library(&file, &sample_books()).unwrap();
    let before = fs::read(file.path()).unwrap();

    let mut library = load_library(&file);
    assert!(!remove_book(&file, &mut library, "nonexistent").unwrap());

    assert_eq!(fs::read(file.path()).unwrap(), before);
    assert_eq!(library, sample_books());
}

#[test]
fn test_remove_reports_write_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("library_data.json");
    fs::create_dir(&path).unwrap();
    let file = LibraryFile::new(path);

    let mut library = sample_books();
    let result = remove_book(&file, &mut library, "Emma");

    assert!(matches!(result, Err(StoreError::Io { .. })));
    assert_eq!(library, sample_books());
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_search_by_author_case_insensitive() {
    let results = search_books(&sample_books(), "TOLKIEN");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].author, "J.R.R. Tolkien");
}

#[test]
fn test_search_spans_title_and_author() {
    let results = search_books(&sample_books(), "herbert");
    assert_eq!(results.len(), 2);

    let results = search_books(&sample_books(), "dune");
    assert_eq!(results.len(), 2);
}

#[test]
fn test_statistics_examples() {
    let stats = calculate_statistics(&[]);
    assert_eq!((stats.total, stats.read_percentage), (0, 0.0));

    let stats = calculate_statistics(&sample_books());
    assert_eq!((stats.total, stats.read_percentage), (4, 50.0));
}

#[test]
fn test_random_pick_is_from_library() {
    let books = sample_books();
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..20 {
        let pick = random_book(&books, &mut rng).unwrap();
        assert!(books.contains(pick));
    }
    assert!(random_book(&[], &mut rng).is_none());
}
