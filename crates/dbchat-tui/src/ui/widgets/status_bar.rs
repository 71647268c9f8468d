//! Status bar widget.

use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// A key hint for the status bar.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Status bar widget displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: &'a [KeyHint],
    right_text: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: &[],
            right_text: None,
        }
    }

    /// Set key hints.
    #[must_use]
    pub fn hints(mut self, hints: &'a [KeyHint]) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::STATUS_BG);
        }

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                Styles::default().bg(Palette::ACCENT).fg(Palette::BG),
            ),
            Span::styled(" ", Styles::status_bar()),
        ];
        for hint in self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(format!(" {} ", hint.label), Styles::key_label()));
        }
        let left = Line::from(spans);
        let left_width = left.width();
        buf.set_line(area.x, area.y, &left, area.width);

        // Right text only when it fits beside the hints.
        if let Some(text) = self.right_text {
            let text_width = text.width();
            let needed = left_width + text_width + 2;
            if needed <= usize::from(area.width) {
                let offset = u16::try_from(text_width + 1).unwrap_or(area.width);
                let x = area.x + area.width - offset;
                buf.set_string(x, area.y, text, Styles::status_bar());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_status_bar_renders_mode_hints_and_right_text() {
        let hints = [KeyHint::new("Enter", "Send")];
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new("DB Chat")
            .hints(&hints)
            .right("localhost:8000")
            .render(area, &mut buf);

        let row = row_text(&buf, area.width);
        assert!(row.starts_with(" DB Chat "));
        assert!(row.contains(" Enter  Send "));
        assert!(row.trim_end().ends_with("localhost:8000"));
    }

    #[test]
    fn test_status_bar_drops_right_text_when_narrow() {
        let hints = [KeyHint::new("Enter", "Send")];
        let area = Rect::new(0, 0, 24, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new("DB Chat")
            .hints(&hints)
            .right("http://localhost:8000/chat")
            .render(area, &mut buf);

        assert!(!row_text(&buf, area.width).contains("localhost"));
    }
}
