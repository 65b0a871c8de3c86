use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// Highest year the add form accepts.
pub(crate) const MAX_YEAR: i32 = 2100;
/// Year inputs never need more digits than this.
const YEAR_DIGITS: usize = 4;

/// Internal representation of the "add book" form fields.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) read: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl BookField {
    pub(crate) const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Read,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
            BookField::Genre => "Genre",
            BookField::Read => "Read",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

impl BookForm {
    /// Cycle focus forward, wrapping from the checkbox back to the title.
    pub(crate) fn next_field(&mut self) {
        let idx = (self.active.index() + 1) % BookField::ALL.len();
        self.active = BookField::ALL[idx];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = BookField::ALL.len();
        let idx = (self.active.index() + len - 1) % len;
        self.active = BookField::ALL[idx];
    }

    /// Append a character to the active field, validating allowed input. On the
    /// checkbox a space toggles the read flag.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Year => {
                if !ch.is_ascii_digit() || self.year.len() >= YEAR_DIGITS {
                    return false;
                }
                self.year.push(ch);
            }
            BookField::Genre => self.genre.push(ch),
            BookField::Read => {
                if ch != ' ' {
                    return false;
                }
                self.read = !self.read;
            }
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
            BookField::Genre => {
                self.genre.pop();
            }
            BookField::Read => {}
        }
    }

    /// Validate the inputs and build the book ready for persistence.
    pub(crate) fn parse_inputs(&self) -> Result<Book> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Book title is required."));
        }
        let year_raw = self.year.trim();
        if year_raw.is_empty() {
            return Err(anyhow!("Year is required."));
        }
        let year = year_raw
            .parse::<i32>()
            .context("Year must be a whole number.")?;
        if !(0..=MAX_YEAR).contains(&year) {
            return Err(anyhow!("Year must be between 0 and {MAX_YEAR}."));
        }
        Ok(Book::new(
            title,
            self.author.trim(),
            year,
            self.genre.trim(),
            self.read,
        ))
    }

    /// Text behind a field, or `None` for the checkbox.
    fn text_value(&self, field: BookField) -> Option<&String> {
        match field {
            BookField::Title => Some(&self.title),
            BookField::Author => Some(&self.author),
            BookField::Year => Some(&self.year),
            BookField::Genre => Some(&self.genre),
            BookField::Read => None,
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let is_active = self.active == field;
        let prefix = format!("{}: ", field.label());

        let Some(value) = self.text_value(field) else {
            let mark = if self.read { "[x]" } else { "[ ]" };
            let style = if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            return Line::from(vec![
                Span::raw(prefix),
                Span::styled(format!("{mark} Mark as read"), style),
            ]);
        };

        let display = if value.is_empty() {
            match field {
                BookField::Title => "<required>",
                BookField::Year => "<0-2100>",
                _ => "<optional>",
            }
            .to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![Span::raw(prefix), Span::styled(display, style)])
    }

    /// Row and column of the cursor relative to the form body. The checkbox
    /// has no cursor.
    pub(crate) fn cursor_offset(&self) -> Option<(u16, usize)> {
        let value = self.text_value(self.active)?;
        let prefix = format!("{}: ", self.active.label()).len();
        Some((self.active.index() as u16, prefix + value.chars().count()))
    }
}

/// What a single-line prompt feeds into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PromptKind {
    Remove,
    Search,
}

/// One-field modal used for "remove by title" and "search".
#[derive(Clone)]
pub(crate) struct Prompt {
    pub(crate) kind: PromptKind,
    pub(crate) input: String,
}

impl Prompt {
    pub(crate) fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        match self.kind {
            PromptKind::Remove => "Remove a Book",
            PromptKind::Search => "Search for a Book",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Remove => "Title: ",
            PromptKind::Search => "Title or author: ",
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.input.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.input.pop();
    }
}
