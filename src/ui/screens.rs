use crate::models::{Book, LibraryStats};

/// Entries of the side menu, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MenuItem {
    Home,
    AddBook,
    RemoveBook,
    SearchBooks,
    ViewLibrary,
    Statistics,
    RandomBook,
}

impl MenuItem {
    pub(crate) const ALL: [MenuItem; 7] = [
        MenuItem::Home,
        MenuItem::AddBook,
        MenuItem::RemoveBook,
        MenuItem::SearchBooks,
        MenuItem::ViewLibrary,
        MenuItem::Statistics,
        MenuItem::RandomBook,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuItem::Home => "Home",
            MenuItem::AddBook => "Add Book",
            MenuItem::RemoveBook => "Remove Book",
            MenuItem::SearchBooks => "Search Books",
            MenuItem::ViewLibrary => "View Library",
            MenuItem::Statistics => "Statistics",
            MenuItem::RandomBook => "Random Book",
        }
    }

    pub(crate) fn index(self) -> usize {
        Self::ALL.iter().position(|item| *item == self).unwrap_or(0)
    }

    /// Step through the menu, clamping at both ends.
    pub(crate) fn offset(self, delta: isize) -> Self {
        let last = Self::ALL.len() as isize - 1;
        let idx = (self.index() as isize + delta).clamp(0, last);
        Self::ALL[idx as usize]
    }

    /// Map the `1`..`7` shortcuts onto menu entries.
    pub(crate) fn from_digit(ch: char) -> Option<Self> {
        let idx = ch.to_digit(10)? as usize;
        idx.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// A scrollable, selectable list of books used by the collection view and by
/// search results.
#[derive(Default)]
pub(crate) struct BookList {
    pub(crate) books: Vec<Book>,
    pub(crate) selected: usize,
}

impl BookList {
    pub(crate) fn new(books: Vec<Book>) -> Self {
        Self { books, selected: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.books.len()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let last = self.books.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }
}

/// State of the search page: nothing searched yet, or the outcome of the last
/// query.
#[derive(Default)]
pub(crate) struct SearchScreen {
    pub(crate) query: Option<String>,
    pub(crate) results: BookList,
}

impl SearchScreen {
    pub(crate) fn with_results(query: String, results: Vec<Book>) -> Self {
        Self {
            query: Some(query),
            results: BookList::new(results),
        }
    }
}

/// What the content pane currently shows. Each variant carries the data that
/// was loaded when the page was opened.
pub(crate) enum Screen {
    Home,
    AddBook,
    RemoveBook,
    Search(SearchScreen),
    Library(BookList),
    Statistics(LibraryStats),
    RandomBook(Option<Book>),
}

impl Screen {
    /// Scrollable list on the current page, if any.
    pub(crate) fn book_list_mut(&mut self) -> Option<&mut BookList> {
        match self {
            Screen::Library(list) => Some(list),
            Screen::Search(search) => Some(&mut search.results),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books(n: usize) -> Vec<Book> {
        (0..n)
            .map(|i| Book::new(format!("Book {i}"), "Author", 2000, "Genre", false))
            .collect()
    }

    #[test]
    fn menu_offset_clamps() {
        assert_eq!(MenuItem::Home.offset(-1), MenuItem::Home);
        assert_eq!(MenuItem::Home.offset(2), MenuItem::RemoveBook);
        assert_eq!(MenuItem::RandomBook.offset(5), MenuItem::RandomBook);
    }

    #[test]
    fn digit_shortcuts() {
        assert_eq!(MenuItem::from_digit('1'), Some(MenuItem::Home));
        assert_eq!(MenuItem::from_digit('7'), Some(MenuItem::RandomBook));
        assert_eq!(MenuItem::from_digit('0'), None);
        assert_eq!(MenuItem::from_digit('8'), None);
        assert_eq!(MenuItem::from_digit('x'), None);
    }

    #[test]
    fn list_selection_stays_in_bounds() {
        let mut list = BookList::new(books(3));
        list.move_selection(10);
        assert_eq!(list.selected, 2);
        list.move_selection(-10);
        assert_eq!(list.selected, 0);
        list.select_last();
        assert_eq!(list.selected, 2);
    }

    #[test]
    fn empty_list_ignores_movement() {
        let mut list = BookList::default();
        list.move_selection(1);
        list.select_last();
        assert_eq!(list.selected, 0);
    }
}
