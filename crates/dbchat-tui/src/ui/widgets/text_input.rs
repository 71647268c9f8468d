//! Multi-line text input widget holding the draft question.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

/// Prompt shown in front of the first input line.
const PROMPT: &str = "> ";

/// A multi-line text input widget.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    /// The text content.
    content: &'a str,
    /// Cursor position (character index).
    cursor: usize,
    /// Placeholder text.
    placeholder: Option<&'a str>,
}

impl<'a> TextInput<'a> {
    /// Create a new text input.
    pub fn new(content: &'a str, cursor: usize) -> Self {
        Self {
            content,
            cursor,
            placeholder: None,
        }
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    fn content_lines(&self) -> Vec<Line<'a>> {
        let indent = " ".repeat(PROMPT.len());
        let mut lines = Vec::new();
        let mut current = vec![Span::styled(PROMPT, Styles::active())];
        let mut text = String::new();
        let mut cursor_drawn = false;

        for (i, ch) in self.content.chars().enumerate() {
            if !cursor_drawn && i == self.cursor {
                current.push(Span::styled(std::mem::take(&mut text), Styles::default()));
                current.push(Span::styled("|", Styles::active()));
                cursor_drawn = true;
            }
            if ch == '\n' {
                current.push(Span::styled(std::mem::take(&mut text), Styles::default()));
                lines.push(Line::from(std::mem::take(&mut current)));
                current.push(Span::raw(indent.clone()));
            } else {
                text.push(ch);
            }
        }

        current.push(Span::styled(text, Styles::default()));
        if !cursor_drawn {
            current.push(Span::styled("_", Styles::active()));
        }
        lines.push(Line::from(current));
        lines
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        // Show placeholder if empty
        if self.content.is_empty() {
            let mut spans = vec![
                Span::styled(PROMPT, Styles::active()),
                Span::styled("_", Styles::active()),
            ];
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let lines = self.content_lines();

        // Keep the last lines visible when the draft outgrows the pane.
        let overflow = lines.len().saturating_sub(usize::from(area.height));
        let visible: Vec<Line<'_>> = lines.into_iter().skip(overflow).collect();

        Paragraph::new(visible)
            .style(Styles::default())
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// State for a text input, managing content, cursor position and history.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// The text content.
    content: String,
    /// Cursor position (character index).
    cursor: usize,
    /// Previously submitted inputs, oldest first.
    history: Vec<String>,
    /// Position while browsing history (`None` = editing the current input).
    history_index: Option<usize>,
    /// Input saved when history browsing started.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position as a character index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the content is a recalled history entry.
    pub fn is_browsing_history(&self) -> bool {
        self.history_index.is_some()
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let offset = self.byte_offset(self.cursor);
        self.content.insert(offset, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let offset = self.byte_offset(self.cursor);
        self.content.insert_str(offset, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset(self.cursor);
            self.content.remove(offset);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let offset = self.byte_offset(self.cursor);
            self.content.remove(offset);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Take the content, recording it in history and clearing the input.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() && self.history.last() != Some(&content) {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Navigate to the previous (older) history entry.
    pub fn history_prev(&mut self) {
        let next = match self.history_index {
            None if self.history.is_empty() => return,
            None => {
                self.saved_input = std::mem::take(&mut self.content);
                self.history.len() - 1
            }
            Some(0) => return,
            Some(i) => i - 1,
        };
        self.show_history(next);
    }

    /// Navigate to the next (newer) history entry, restoring the saved input
    /// past the newest one.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(i) if i + 1 < self.history.len() => self.show_history(i + 1),
            Some(_) => {
                self.history_index = None;
                self.content = std::mem::take(&mut self.saved_input);
                self.move_end();
            }
        }
    }

    fn show_history(&mut self, index: usize) {
        self.history_index = Some(index);
        self.content = self.history[index].clone();
        self.move_end();
    }

    /// Create a widget from this state.
    pub fn widget(&self) -> TextInput<'_> {
        TextInput::new(&self.content, self.cursor)
    }
}
