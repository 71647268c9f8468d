//! Chat screen: transcript, input and status bar.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::chat_layout;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar, TranscriptView};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Widget},
};

const HINTS: [KeyHint; 3] = [
    KeyHint::new("Enter", "Send"),
    KeyHint::new("F1", "Help"),
    KeyHint::new("Esc", "Quit"),
];

/// The chat screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (transcript_area, input_area, status_area) = chat_layout(area);

        TranscriptView::new(app.conversation())
            .title(" DB Chat ")
            .scroll_from_bottom(app.transcript_scroll)
            .render(transcript_area, buf);

        render_input(app, input_area, buf);

        StatusBar::new("DB Chat")
            .hints(&HINTS)
            .right(&app.endpoint)
            .render(status_area, buf);
    }
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Input ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    app.input_state
        .widget()
        .placeholder(&app.placeholder)
        .render(inner, buf);
}
