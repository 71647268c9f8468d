//! Transcript widget.
//!
//! Turns the engine's rendered messages into styled, pre-wrapped lines so
//! the total height is known and the view can stick to the bottom.

use crate::ui::theme::{Styles, Symbols};
use dbchat_engine::{Conversation, RenderedBody, RenderedMessage, Table};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Indentation of message bodies under the role label.
const BODY_INDENT: &str = "  ";

/// Transcript pane showing every message of a conversation.
pub struct TranscriptView<'a> {
    conversation: &'a Conversation,
    /// Lines scrolled up from the bottom (0 = follow newest).
    scroll_from_bottom: usize,
    title: &'a str,
}

impl<'a> TranscriptView<'a> {
    /// Create a transcript view.
    pub fn new(conversation: &'a Conversation) -> Self {
        Self {
            conversation,
            scroll_from_bottom: 0,
            title: " Transcript ",
        }
    }

    /// Set the scroll offset, counted in lines from the bottom.
    #[must_use]
    pub fn scroll_from_bottom(mut self, lines: usize) -> Self {
        self.scroll_from_bottom = lines;
        self
    }

    /// Set the block title.
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = transcript_lines(self.conversation, usize::from(inner.width));
        let height = usize::from(inner.height);
        let max_start = lines.len().saturating_sub(height);
        let start = max_start.saturating_sub(self.scroll_from_bottom);

        let visible: Vec<Line<'_>> = lines.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible)
            .style(Styles::default())
            .render(inner, buf);
    }
}

/// Build the styled lines for a whole conversation at the given width.
pub fn transcript_lines(conversation: &Conversation, width: usize) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for message in conversation.render() {
        push_message(&mut lines, &message, width);
        lines.push(Line::default());
    }
    // Drop the blank line after the last message.
    lines.pop();
    lines
}

fn push_message<'a>(lines: &mut Vec<Line<'a>>, message: &RenderedMessage<'a>, width: usize) {
    lines.push(Line::from(Span::styled(
        format!("{}:", message.role),
        Styles::role(message.role),
    )));

    let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
    match &message.body {
        RenderedBody::Text(text) => push_wrapped(lines, text, body_width, Styles::default()),
        RenderedBody::Error(error) => {
            let text = format!("{} {error}", Symbols::ERROR);
            push_wrapped(lines, &text, body_width, Styles::error());
        }
        RenderedBody::Structured {
            narrative,
            query,
            table,
        } => {
            if let Some(narrative) = narrative {
                push_wrapped(lines, narrative, body_width, Styles::default());
            }
            if let Some(query) = query {
                for line in query.lines() {
                    lines.push(indented(format!(" {line} "), Styles::code()));
                }
            }
            if let Some(table) = table {
                push_table(lines, table);
            }
        }
    }
}

fn push_table(lines: &mut Vec<Line<'_>>, table: &Table<'_>) {
    let layout = table.layout();
    lines.push(indented(layout.header, Styles::table_header()));
    lines.push(indented(layout.separator, Styles::dim()));
    for row in layout.rows {
        lines.push(indented(row, Styles::default()));
    }
    if let Some(summary) = table.ragged_summary() {
        lines.push(indented(
            format!("{} {summary}", Symbols::WARN),
            Styles::warning(),
        ));
    }
}

fn push_wrapped(lines: &mut Vec<Line<'_>>, text: &str, width: usize, style: Style) {
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(indented(String::new(), style));
            continue;
        }
        for wrapped in textwrap::wrap(paragraph, width) {
            lines.push(indented(wrapped.into_owned(), style));
        }
    }
}

fn indented<'a>(text: String, style: Style) -> Line<'a> {
    Line::from(vec![Span::raw(BODY_INDENT), Span::styled(text, style)])
}
