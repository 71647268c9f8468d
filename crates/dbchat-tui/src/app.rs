//! Application state and update logic for the dbchat TUI.

use crate::event::{key_to_action, mouse_to_action, Action};
use crate::ui::chat_layout;
use crate::ui::widgets::{transcript_lines, TextInputState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use dbchat_engine::{
    Config, Conversation, ConversationView, Effect, MessageContent, OutboundRequest,
    RequestFailure, ViewEvent,
};
use ratatui::layout::Rect;

/// Lines moved by PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Screen size assumed until the first draw.
const INITIAL_SCREEN: Rect = Rect::new(0, 0, 80, 24);

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Conversation and pending requests.
    view: ConversationView,

    /// Draft question and input history.
    pub input_state: TextInputState,

    /// Placeholder shown while the draft is empty.
    pub placeholder: String,

    /// Endpoint shown in the status bar.
    pub endpoint: String,

    /// Transcript scroll, in lines up from the bottom.
    pub transcript_scroll: usize,

    /// Inner width and height of the transcript pane.
    transcript_viewport: (usize, usize),
}

impl App {
    /// Create a new app instance.
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            view: ConversationView::new(config.greeting.clone()),
            input_state: TextInputState::new(),
            placeholder: config.placeholder.clone(),
            endpoint: config.endpoint.clone(),
            transcript_scroll: 0,
            transcript_viewport: (0, 0),
        }
        .with_screen(INITIAL_SCREEN)
    }

    fn with_screen(mut self, screen: Rect) -> Self {
        self.set_screen(screen);
        self
    }

    /// Record the screen size so scrolling can be bounded by the transcript.
    pub fn set_screen(&mut self, screen: Rect) {
        let (transcript, _, _) = chat_layout(screen);
        // Inside the pane borders
        self.transcript_viewport = (
            usize::from(transcript.width.saturating_sub(2)),
            usize::from(transcript.height.saturating_sub(2)),
        );
        self.transcript_scroll = self.transcript_scroll.min(self.max_scroll());
    }

    fn transcript_line_count(&self) -> usize {
        transcript_lines(self.conversation(), self.transcript_viewport.0).len()
    }

    /// Largest scroll offset that still fills the pane.
    fn max_scroll(&self) -> usize {
        self.transcript_line_count()
            .saturating_sub(self.transcript_viewport.1)
    }

    /// App with default settings, for tests.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::new(&Config::default())
    }

    /// The transcript shown in the transcript pane.
    pub fn conversation(&self) -> &Conversation {
        self.view.conversation()
    }

    /// Number of requests still waiting for a reply.
    pub fn in_flight(&self) -> usize {
        self.view.in_flight()
    }

    fn dispatch(&mut self, event: ViewEvent) -> Option<Effect> {
        let view = std::mem::take(&mut self.view);
        let (view, effect) = view.update(event);
        self.view = view;
        effect
    }

    /// Submit the current draft, returning the request to send, if any.
    pub fn submit_draft(&mut self) -> Option<OutboundRequest> {
        let draft = self.input_state.submit();
        let effect = self.dispatch(ViewEvent::Submit { draft })?;
        self.transcript_scroll = 0;
        match effect {
            Effect::Send(request) => Some(request),
        }
    }

    /// Feed a finished request back into the conversation.
    pub fn receive_reply(
        &mut self,
        request_id: u64,
        outcome: Result<MessageContent, RequestFailure>,
    ) {
        let before = self.transcript_line_count();
        // Replies never request further effects.
        let _ = self.dispatch(ViewEvent::ReplyReceived {
            request_id,
            outcome,
        });

        // Keep the visible lines in place while scrolled up
        if self.transcript_scroll > 0 {
            let added = self.transcript_line_count().saturating_sub(before);
            self.transcript_scroll = (self.transcript_scroll + added).min(self.max_scroll());
        }
    }

    /// Handle a key press, returning a request to send if the draft was submitted.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<OutboundRequest> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let action = key_to_action(key);

        // If help is showing, any key but Ctrl+C closes it
        if self.show_help {
            if action == Action::Quit {
                self.should_quit = true;
            } else {
                self.show_help = false;
            }
            return None;
        }

        match action {
            Action::ScrollUp if self.recalls_history() => self.input_state.history_prev(),
            Action::ScrollDown if self.recalls_history() => self.input_state.history_next(),
            Action::None => return self.handle_edit_key(key),
            other => self.handle_action(other),
        }
        None
    }

    fn recalls_history(&self) -> bool {
        self.input_state.is_empty() || self.input_state.is_browsing_history()
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<OutboundRequest> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter if key.modifiers.is_empty() => return self.submit_draft(),
            KeyCode::Enter => self.input_state.insert('\n'),
            KeyCode::Char('j') if ctrl => self.input_state.insert('\n'),
            KeyCode::Char(c) if !ctrl => self.input_state.insert(c),
            KeyCode::Backspace => self.input_state.backspace(),
            KeyCode::Delete => self.input_state.delete(),
            KeyCode::Left => self.input_state.move_left(),
            KeyCode::Right => self.input_state.move_right(),
            KeyCode::Home => self.input_state.move_home(),
            KeyCode::End => self.input_state.move_end(),
            _ => {}
        }
        None
    }

    /// Insert pasted text into the draft.
    pub fn handle_paste(&mut self, text: &str) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        // Normalize Windows line endings
        self.input_state.insert_str(&text.replace("\r\n", "\n"));
    }

    /// Handle a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        self.handle_action(mouse_to_action(mouse));
    }

    /// Handle a global action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = !self.show_help,
            Action::Back => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE_LINES),
            Action::PageDown => self.scroll_down(PAGE_LINES),
            Action::None => {}
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.transcript_scroll = self
            .transcript_scroll
            .saturating_add(lines)
            .min(self.max_scroll());
    }

    fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::chat::ChatScreen;
    use crate::test_utils::render_screen_to_string;
    use dbchat_engine::Role;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    /// Submit `count` questions so the transcript outgrows the pane.
    fn ask_many(app: &mut App, count: usize) -> Vec<OutboundRequest> {
        (0..count)
            .map(|i| {
                app.input_state.insert_str(&format!("question {i}"));
                app.submit_draft().unwrap()
            })
            .collect()
    }

    fn screen(app: &App) -> String {
        render_screen_to_string(&ChatScreen, app)
    }

    #[test]
    fn test_new_app_shows_greeting() {
        let app = App::new_for_test();
        assert_eq!(app.conversation().len(), 1);
        assert_eq!(app.conversation().messages()[0].role, Role::System);
        assert_eq!(app.placeholder, "Ask: top customers by amount");
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn test_enter_submits_draft() {
        let mut app = App::new_for_test();
        type_text(&mut app, "top customers");

        let request = app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(request.message, "top customers");
        assert!(app.input_state.is_empty());
        assert_eq!(app.in_flight(), 1);

        let last = app.conversation().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, MessageContent::text("top customers"));
    }

    #[test]
    fn test_enter_on_empty_draft_does_nothing() {
        let mut app = App::new_for_test();
        assert!(app.handle_key(press(KeyCode::Enter)).is_none());
        assert_eq!(app.conversation().len(), 1);
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn test_modified_enter_inserts_newline() {
        let mut app = App::new_for_test();
        type_text(&mut app, "a");
        assert!(app
            .handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT))
            .is_none());
        app.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL));
        type_text(&mut app, "b");
        assert_eq!(app.input_state.content(), "a\n\nb");
    }

    #[test]
    fn test_reply_is_appended() {
        let mut app = App::new_for_test();
        type_text(&mut app, "q");
        let request = app.handle_key(press(KeyCode::Enter)).unwrap();

        app.receive_reply(
            request.request_id,
            Err(RequestFailure::Transport("Connection refused".into())),
        );

        assert_eq!(app.in_flight(), 0);
        let last = app.conversation().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, MessageContent::error("Connection refused"));
    }

    #[test]
    fn test_up_recalls_history_only_when_draft_empty() {
        let mut app = App::new_for_test();
        ask_many(&mut app, 10);
        type_text(&mut app, "first");
        app.handle_key(press(KeyCode::Enter));

        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.input_state.content(), "first");
        assert_eq!(app.transcript_scroll, 0);

        app.handle_key(press(KeyCode::Down));
        assert!(app.input_state.is_empty());

        type_text(&mut app, "x");
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.input_state.content(), "x");
        assert_eq!(app.transcript_scroll, 1);
    }

    #[test]
    fn test_page_keys_scroll_and_submit_resets() {
        let mut app = App::new_for_test();
        ask_many(&mut app, 10);
        app.handle_key(press(KeyCode::PageUp));
        assert_eq!(app.transcript_scroll, PAGE_LINES);
        app.handle_key(press(KeyCode::PageDown));
        app.handle_key(press(KeyCode::PageDown));
        assert_eq!(app.transcript_scroll, 0);

        app.handle_key(press(KeyCode::PageUp));
        type_text(&mut app, "q");
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.transcript_scroll, 0);
    }

    #[test]
    fn test_scrolling_stops_at_the_top() {
        let mut app = App::new_for_test();
        ask_many(&mut app, 30);
        let max = app.max_scroll();
        assert!(max > PAGE_LINES);

        for _ in 0..20 {
            app.handle_key(press(KeyCode::PageUp));
        }
        assert_eq!(app.transcript_scroll, max);
        let top = screen(&app);
        assert!(top.contains("Ask about DB"));

        app.handle_key(press(KeyCode::PageDown));
        assert_eq!(app.transcript_scroll, max - PAGE_LINES);
        assert_ne!(screen(&app), top);
    }

    #[test]
    fn test_reply_keeps_view_in_place_when_scrolled_up() {
        let mut app = App::new_for_test();
        let requests = ask_many(&mut app, 30);
        app.handle_key(press(KeyCode::PageUp));
        let before = screen(&app);

        app.receive_reply(requests[0].request_id, Ok(MessageContent::text("answer")));

        assert_eq!(app.transcript_scroll, PAGE_LINES + 3);
        assert_eq!(screen(&app), before);
    }

    #[test]
    fn test_reply_is_followed_at_the_bottom() {
        let mut app = App::new_for_test();
        let requests = ask_many(&mut app, 30);

        app.receive_reply(requests[0].request_id, Ok(MessageContent::text("answer")));

        assert_eq!(app.transcript_scroll, 0);
        assert!(screen(&app).contains("  answer"));
    }

    #[test]
    fn test_larger_screen_clamps_scroll() {
        let mut app = App::new_for_test();
        ask_many(&mut app, 5);
        app.transcript_scroll = app.max_scroll();
        assert!(app.transcript_scroll > 0);

        app.set_screen(Rect::new(0, 0, 80, 60));
        assert_eq!(app.transcript_scroll, 0);
    }

    #[test]
    fn test_help_toggle_and_escape() {
        let mut app = App::new_for_test();
        app.handle_key(press(KeyCode::F(1)));
        assert!(app.show_help);

        // Any key closes help without editing
        app.handle_key(press(KeyCode::Char('x')));
        assert!(!app.show_help);
        assert!(app.input_state.is_empty());

        app.handle_key(press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_even_with_help_open() {
        let mut app = App::new_for_test();
        app.show_help = true;
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_paste_keeps_newlines_without_submitting() {
        let mut app = App::new_for_test();
        app.handle_paste("SELECT 1\r\nFROM t");
        assert_eq!(app.input_state.content(), "SELECT 1\nFROM t");
        assert_eq!(app.conversation().len(), 1);
    }

    #[test]
    fn test_greeting_comes_from_config() {
        let config = Config {
            greeting: "Hello".into(),
            ..Config::default()
        };
        let app = App::new(&config);
        assert_eq!(
            app.conversation().messages()[0].content,
            MessageContent::text("Hello")
        );
    }
}
