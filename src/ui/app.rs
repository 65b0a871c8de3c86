use std::mem;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::config::{CoverImage, LOCAL_COVER_PATH};
use crate::models::{Book, LibraryStats};
use crate::store::{
    add_book, calculate_statistics, load_library, random_book, remove_book, search_books,
    LibraryFile,
};

use super::forms::{BookField, BookForm, Prompt, PromptKind};
use super::helpers::{book_line, centered_rect, cursor_in, status_style, surface_error};
use super::screens::{BookList, MenuItem, Screen, SearchScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the left-hand menu.
const MENU_WIDTH: u16 = 22;
/// Rows jumped by PageUp/PageDown in book lists.
const PAGE_STEP: isize = 5;

/// Modal state layered over the current screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    Prompting(Prompt),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
///
/// `library` is only a snapshot: it is reloaded from `file` before every
/// action so changes made by another process since the last keypress are
/// picked up.
pub struct App {
    file: LibraryFile,
    library: Vec<Book>,
    menu: MenuItem,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    cover: CoverImage,
}

impl App {
    pub fn new(file: LibraryFile) -> Self {
        let library = load_library(&file);
        Self {
            file,
            library,
            menu: MenuItem::Home,
            screen: Screen::Home,
            mode: Mode::Normal,
            status: None,
            cover: CoverImage::resolve(Path::new(LOCAL_COVER_PATH)),
        }
    }

    /// Books as of the last reload.
    pub fn library(&self) -> &[Book] {
        &self.library
    }

    /// Feed one keypress through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::Prompting(prompt) => self.handle_prompt(code, prompt),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.select_menu(self.menu.offset(-1)),
            KeyCode::Down => self.select_menu(self.menu.offset(1)),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if let Some(item) = MenuItem::from_digit(ch) {
                    self.select_menu(item);
                }
            }
            KeyCode::PageUp | KeyCode::PageDown | KeyCode::Home | KeyCode::End => {
                if let Some(list) = self.screen.book_list_mut() {
                    match code {
                        KeyCode::PageUp => list.move_selection(-PAGE_STEP),
                        KeyCode::PageDown => list.move_selection(PAGE_STEP),
                        KeyCode::Home => list.select_first(),
                        _ => list.select_last(),
                    }
                }
            }
            KeyCode::Char('o') | KeyCode::Char('O') if self.menu == MenuItem::Home => {
                self.open_cover();
            }
            KeyCode::Char('r') | KeyCode::Char('R') if self.menu == MenuItem::RandomBook => {
                self.clear_status();
                self.select_menu(MenuItem::RandomBook);
            }
            KeyCode::Enter => return self.activate(),
            _ => {}
        }
        Mode::Normal
    }

    /// Enter on the current page: open its form, or refresh what it shows.
    fn activate(&mut self) -> Mode {
        self.clear_status();
        match self.menu {
            MenuItem::AddBook => Mode::AddingBook(BookForm::default()),
            MenuItem::RemoveBook => Mode::Prompting(Prompt::new(PromptKind::Remove)),
            MenuItem::SearchBooks => Mode::Prompting(Prompt::new(PromptKind::Search)),
            item => {
                self.select_menu(item);
                Mode::Normal
            }
        }
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingBook(form)
    }

    fn handle_prompt(&mut self, code: KeyCode, mut prompt: Prompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Mode::Normal;
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => {
                let outcome = match prompt.kind {
                    PromptKind::Remove => self.perform_remove(&prompt.input),
                    PromptKind::Search => {
                        self.perform_search(&prompt.input);
                        Ok(())
                    }
                };
                match outcome {
                    Ok(()) => return Mode::Normal,
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
            }
            KeyCode::Char(ch) => {
                prompt.push_char(ch);
            }
            _ => {}
        }
        Mode::Prompting(prompt)
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let book = form.parse_inputs()?;
        let title = book.title.clone();
        self.reload_library();
        add_book(&self.file, &mut self.library, book).context("failed to add book")?;
        self.refresh_screen();
        self.set_status(format!("'{title}' has been added!"), StatusKind::Info);
        Ok(())
    }

    fn perform_remove(&mut self, title: &str) -> Result<()> {
        self.reload_library();
        let removed =
            remove_book(&self.file, &mut self.library, title).context("failed to remove book")?;
        self.refresh_screen();
        if removed {
            self.set_status(format!("'{title}' has been removed!"), StatusKind::Info);
        } else {
            self.set_status("Book not found!", StatusKind::Error);
        }
        Ok(())
    }

    fn perform_search(&mut self, query: &str) {
        self.reload_library();
        let results = search_books(&self.library, query);
        if results.is_empty() {
            self.set_status("No books found!", StatusKind::Error);
        } else {
            self.clear_status();
        }
        self.screen = Screen::Search(SearchScreen::with_results(query.to_string(), results));
    }

    fn open_cover(&mut self) {
        let location = self.cover.target();
        match open_link(&location) {
            Ok(()) => {
                debug!(%location, "opened cover image");
                self.set_status(format!("Opened {location}."), StatusKind::Info);
            }
            Err(err) => {
                warn!(%location, error = %err, "failed to open cover image");
                let err = anyhow!(err).context("Failed to open cover image");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    /// Switch pages. Every switch reloads the library so the new page reflects
    /// what is on disk.
    fn select_menu(&mut self, item: MenuItem) {
        if item != self.menu {
            self.clear_status();
        }
        self.menu = item;
        self.reload_library();
        self.screen = self.build_screen();
    }

    /// Rebuild the current page from the in-memory library without touching
    /// the disk, keeping the list position where possible.
    fn refresh_screen(&mut self) {
        let selected = match &self.screen {
            Screen::Library(list) => Some(list.selected),
            _ => None,
        };
        self.screen = self.build_screen();
        if let (Some(selected), Screen::Library(list)) = (selected, &mut self.screen) {
            list.selected = selected;
            list.move_selection(0);
        }
    }

    fn build_screen(&self) -> Screen {
        match self.menu {
            MenuItem::Home => Screen::Home,
            MenuItem::AddBook => Screen::AddBook,
            MenuItem::RemoveBook => Screen::RemoveBook,
            MenuItem::SearchBooks => Screen::Search(SearchScreen::default()),
            MenuItem::ViewLibrary => Screen::Library(BookList::new(self.library.clone())),
            MenuItem::Statistics => Screen::Statistics(calculate_statistics(&self.library)),
            MenuItem::RandomBook => {
                let pick = random_book(&self.library, &mut rand::thread_rng()).cloned();
                Screen::RandomBook(pick)
            }
        }
    }

    fn reload_library(&mut self) {
        self.library = load_library(&self.file);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (body_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
            .split(body_area);

        self.draw_menu(frame, columns[0]);

        let content_area = columns[1];
        match &self.screen {
            Screen::Home => self.draw_home(frame, content_area),
            Screen::AddBook => self.draw_hint(
                frame,
                content_area,
                "Add a New Book",
                "Press Enter to fill in a new book.",
            ),
            Screen::RemoveBook => self.draw_hint(
                frame,
                content_area,
                "Remove a Book",
                "Press Enter and type the title of the book to remove.",
            ),
            Screen::Search(search) => self.draw_search(frame, content_area, search),
            Screen::Library(list) => self.draw_library(frame, content_area, list),
            Screen::Statistics(stats) => self.draw_statistics(frame, content_area, stats),
            Screen::RandomBook(pick) => self.draw_random(frame, content_area, pick.as_ref()),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::Prompting(prompt) => self.draw_prompt(frame, area, prompt),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(idx, item)| ListItem::new(format!("{} {}", idx + 1, item.label())))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Library Manager").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.menu.index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect) {
        let cover = match &self.cover {
            CoverImage::Local(path) => format!("Cover: {}", path.display()),
            CoverImage::Remote(url) => format!("Cover: {url}"),
        };
        let lines = vec![
            Line::from(Span::styled(
                "Welcome to Your Digital Library",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Manage your personal book collection effortlessly."),
            Line::from("  - Add books"),
            Line::from("  - Search for books"),
            Line::from("  - Track your reading progress"),
            Line::from("  - Get a random book suggestion"),
            Line::from(""),
            Line::from(format!("Books in library: {}", self.library.len())),
            Line::from(""),
            Line::from(Span::styled(cover, Style::default().fg(Color::DarkGray))),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Home").borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_hint(&self, frame: &mut Frame, area: Rect, title: &str, hint: &str) {
        let paragraph = Paragraph::new(hint.to_string())
            .alignment(Alignment::Center)
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, search: &SearchScreen) {
        let Some(query) = &search.query else {
            self.draw_hint(
                frame,
                area,
                "Search for a Book",
                "Press Enter and type part of a title or author.",
            );
            return;
        };

        let title = format!("Search: \"{query}\"");
        if search.results.is_empty() {
            self.draw_hint(frame, area, &title, "No books found!");
            return;
        }

        let heading = format!("Found {} books:", search.results.len());
        self.render_book_list(frame, area, &title, &heading, &search.results);
    }

    fn draw_library(&self, frame: &mut Frame, area: Rect, list: &BookList) {
        if list.is_empty() {
            self.draw_hint(
                frame,
                area,
                "Your Library Collection",
                "Your library is empty!",
            );
            return;
        }
        let heading = format!("Total Books: {}", list.len());
        self.render_book_list(frame, area, "Your Library Collection", &heading, list);
    }

    fn render_book_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        heading: &str,
        list: &BookList,
    ) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let header = Paragraph::new(Line::from(Span::styled(
            heading.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = list
            .books
            .iter()
            .map(|book| ListItem::new(book_line(book)))
            .collect();
        let widget = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("- ");

        let mut state = ListState::default();
        state.select(Some(list.selected));
        frame.render_stateful_widget(widget, chunks[1], &mut state);
    }

    fn draw_statistics(&self, frame: &mut Frame, area: Rect, stats: &LibraryStats) {
        let block = Block::default()
            .title("Library Statistics")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let metrics = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let metric = |label: &str, value: String| {
            Paragraph::new(vec![
                Line::from(Span::styled(
                    value,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().title(label.to_string()).borders(Borders::ALL))
        };

        frame.render_widget(metric("Total Books", stats.total.to_string()), metrics[0]);
        frame.render_widget(
            metric("Read Percentage", format!("{:.2}%", stats.read_percentage)),
            metrics[1],
        );

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(stats.read_ratio())
            .label(format!("{} of {} read", stats.read, stats.total));
        frame.render_widget(gauge, rows[1]);
    }

    fn draw_random(&self, frame: &mut Frame, area: Rect, pick: Option<&Book>) {
        let title = "Random Book Suggestion";
        let Some(book) = pick else {
            self.draw_hint(frame, area, title, "No books in your library yet!");
            return;
        };

        let lines = vec![
            Line::from(Span::styled(
                book.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::raw(format!(
                    "{} ({}) - {} - ",
                    book.author, book.year, book.genre
                )),
                Span::styled(book.status_tag(), status_style(book)),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let mut keys: Vec<(&str, &str)> = match &self.mode {
            Mode::AddingBook(_) => vec![
                ("[Tab]", "Next field"),
                ("[Space]", "Toggle read"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ],
            Mode::Prompting(_) => vec![("[Enter]", "Submit"), ("[Esc]", "Cancel")],
            Mode::Normal => vec![("[↑↓]", "Menu"), ("[1-7]", "Jump")],
        };

        if matches!(self.mode, Mode::Normal) {
            match self.menu {
                MenuItem::Home => keys.push(("[o]", "Open cover")),
                MenuItem::AddBook => keys.push(("[Enter]", "Add")),
                MenuItem::RemoveBook => keys.push(("[Enter]", "Remove")),
                MenuItem::SearchBooks => {
                    keys.push(("[Enter]", "Search"));
                    keys.push(("[PgUp/PgDn]", "Scroll"));
                }
                MenuItem::ViewLibrary => keys.push(("[PgUp/PgDn]", "Scroll")),
                MenuItem::Statistics => keys.push(("[Enter]", "Refresh")),
                MenuItem::RandomBook => keys.push(("[Enter/r]", "Another")),
            }
            keys.push(("[q]", "Quit"));
        }

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (key, label) in keys {
            spans.push(Span::styled(key.to_string(), key_style));
            spans.push(Span::raw(format!(" {label}   ")));
        }
        Line::from(spans)
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add a New Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if let Some((row, col)) = form.cursor_offset() {
            frame.set_cursor_position(cursor_in(inner, col, row));
        }
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect, prompt: &Prompt) {
        let popup_area = centered_rect(60, 20, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(prompt.title()).borders(Borders::ALL);
        let paragraph = Paragraph::new(Line::from(vec![
            Span::raw(prompt.label()),
            Span::styled(prompt.input.clone(), Style::default().fg(Color::Yellow)),
        ]))
        .block(block.clone())
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let col = prompt.label().len() + prompt.input.chars().count();
        frame.set_cursor_position(cursor_in(inner, col, 0));
    }
}
