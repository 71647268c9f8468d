//! Render model for the transcript.
//!
//! Rendering is front-end agnostic: each message becomes a
//! [`RenderedMessage`] that the terminal UI and the plain-text printer turn
//! into their own output.

use crate::message::{Message, MessageContent, Role, StructuredResult};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Lazy iterator over rendered messages.
///
/// Messages are rendered on demand. Clone it to replay from the current
/// position, or call [`Conversation::render`](crate::Conversation::render)
/// again to start over.
#[derive(Debug, Clone)]
pub struct Transcript<'a> {
    inner: std::slice::Iter<'a, Message>,
}

impl<'a> Transcript<'a> {
    pub(crate) fn new(messages: &'a [Message]) -> Self {
        Self {
            inner: messages.iter(),
        }
    }
}

impl<'a> Iterator for Transcript<'a> {
    type Item = RenderedMessage<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(render_message)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Transcript<'_> {}

impl DoubleEndedIterator for Transcript<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(render_message)
    }
}

/// One rendered transcript row.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage<'a> {
    /// Author of the message.
    pub role: Role,
    /// Visual body.
    pub body: RenderedBody<'a>,
}

/// Visual body of a message.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBody<'a> {
    /// A plain text line.
    Text(&'a str),
    /// An error line, shown distinctly.
    Error(&'a str),
    /// Structured result parts; each is present only if the reply had it.
    Structured {
        narrative: Option<&'a str>,
        query: Option<&'a str>,
        table: Option<Table<'a>>,
    },
}

/// A table with every cell coerced to a display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<'a> {
    /// Header cells.
    pub header: Vec<&'a str>,
    /// Body rows.
    pub rows: Vec<Vec<String>>,
    /// Indices of rows whose length differs from the header.
    pub ragged_rows: Vec<usize>,
}

impl Table<'_> {
    /// Whether any row length differs from the header length.
    pub fn is_ragged(&self) -> bool {
        !self.ragged_rows.is_empty()
    }

    /// Describe the rows that do not match the header, 1-based.
    pub fn ragged_summary(&self) -> Option<String> {
        if !self.is_ragged() {
            return None;
        }
        let rows: Vec<String> = self.ragged_rows.iter().map(|i| (i + 1).to_string()).collect();
        Some(format!(
            "row(s) {} do not match the {} column(s)",
            rows.join(", "),
            self.header.len()
        ))
    }

    /// Widest row length, header included.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// Display width of every column.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.width()];
        let header = self.header.iter().copied();
        let body = self.rows.iter().flat_map(|row| row.iter().map(String::as_str).enumerate());
        for (i, cell) in header.enumerate().chain(body) {
            widths[i] = widths[i].max(UnicodeWidthStr::width(cell));
        }
        widths
    }

    /// Lay the table out as aligned text lines.
    ///
    /// Short rows stop after their last cell; trailing spaces are trimmed.
    pub fn layout(&self) -> TableLayout {
        let widths = self.column_widths();
        let header = format_row(&widths, self.header.iter().copied());
        let separator = widths
            .iter()
            .map(|&w| "─".repeat(w))
            .collect::<Vec<_>>()
            .join("─┼─");
        let rows = self
            .rows
            .iter()
            .map(|row| format_row(&widths, row.iter().map(String::as_str)))
            .collect();

        TableLayout {
            header,
            separator,
            rows,
        }
    }
}

const COLUMN_SEPARATOR: &str = " │ ";

/// A table laid out as text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Header line.
    pub header: String,
    /// Rule between header and body.
    pub separator: String,
    /// Body lines.
    pub rows: Vec<String>,
}

fn format_row<'c>(widths: &[usize], cells: impl Iterator<Item = &'c str>) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| pad_to_width(cell, w))
        .collect();
    padded.join(COLUMN_SEPARATOR).trim_end().to_string()
}

fn pad_to_width(cell: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(cell));
    format!("{cell}{}", " ".repeat(padding))
}

/// Render a single message.
pub fn render_message(message: &Message) -> RenderedMessage<'_> {
    let body = match &message.content {
        MessageContent::Text { text } => RenderedBody::Text(text),
        MessageContent::Error { error } => RenderedBody::Error(error),
        MessageContent::Structured(result) => render_structured(result),
    };
    RenderedMessage {
        role: message.role,
        body,
    }
}

fn render_structured(result: &StructuredResult) -> RenderedBody<'_> {
    let table = result.columns.as_ref().map(|columns| {
        let header: Vec<&str> = columns.iter().map(String::as_str).collect();
        let rows: Vec<Vec<String>> = result
            .rows
            .iter()
            .flatten()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        let ragged_rows = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != header.len())
            .map(|(i, _)| i)
            .collect();
        Table {
            header,
            rows,
            ragged_rows,
        }
    });

    RenderedBody::Structured {
        narrative: result.narrative.as_deref(),
        query: result.sql.as_deref(),
        table,
    }
}

/// Coerce a cell value to its display string.
///
/// Strings are shown raw; everything else as compact JSON (`null`, `true`,
/// `2.5`, `[1,2]`).
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
