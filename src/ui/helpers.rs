use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// Colour for a book's read/unread tag.
pub(crate) fn status_style(book: &Book) -> Style {
    if book.read {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

/// `Title by Author (Year) - Genre - [Status]` with the title in bold and the
/// tag coloured by read state.
pub(crate) fn book_line(book: &Book) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            book.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" by "),
        Span::styled(
            book.author.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        ),
        Span::raw(format!(" ({}) - {} - ", book.year, book.genre)),
        Span::styled(book.status_tag(), status_style(book)),
    ])
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let margin_x = (100 - percent_x) / 2;
    let margin_y = (100 - percent_y) / 2;

    let column = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin_x),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(margin_x),
        ])
        .split(area)[1];

    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(margin_y),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(margin_y),
        ])
        .split(column)[1]
}

/// Cursor position `col` cells right and `row` lines down from the top-left of
/// `inner`, kept inside `inner` when the text runs past its edge.
pub(crate) fn cursor_in(inner: Rect, col: usize, row: u16) -> (u16, u16) {
    let col = u16::try_from(col).unwrap_or(u16::MAX);
    let x = inner
        .x
        .saturating_add(col)
        .min(inner.right().saturating_sub(1));
    let y = inner
        .y
        .saturating_add(row)
        .min(inner.bottom().saturating_sub(1));
    (x, y)
}

/// Turn an error chain into a footer message: the outermost context plus the
/// root cause when they differ.
pub(crate) fn surface_error(err: &Error) -> String {
    let top = err.to_string();
    match err.chain().last().map(|cause| cause.to_string()) {
        Some(root) if root != top => format!("{top}: {root}"),
        _ => top,
    }
}
