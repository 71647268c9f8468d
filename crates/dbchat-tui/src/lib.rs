//! dbchat-tui: Terminal UI for dbchat
//!
//! This crate provides the interactive front end:
//! - Chat screen with transcript, input and status bar
//! - Help overlay
//! - Event loop running chat requests on background tasks

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::App;
pub use dbchat_engine;
pub use event::{Action, Event, EventHandler};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dbchat_engine::{ChatClient, Config, MessageContent, OutboundRequest, RequestFailure};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::task::JoinHandle;

/// A chat request running in the background, keyed by request id.
type ReplyTask = (u64, JoinHandle<Result<MessageContent, RequestFailure>>);

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client = ChatClient::from_config(&config);
    let mut app = App::new(&config);

    tracing::info!(endpoint = %client.endpoint(), "starting chat UI");

    // 4 Hz tick keeps finished requests flowing in without input
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events, &client).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    client: &ChatClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reply_tasks: Vec<ReplyTask> = Vec::new();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.set_screen(area);
            let buf = frame.buffer_mut();

            screens::chat::ChatScreen.render(app, area, buf);

            if app.show_help {
                screens::render_help_overlay(area, buf);
            }
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if let Some(request) = app.handle_key(key) {
                        reply_tasks.push(spawn_request(client, request));
                    }
                }
                Event::Paste(text) => app.handle_paste(&text),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Tick | Event::Resize(_, _) => {}
            }
        }

        // Collect finished requests (non-blocking)
        let mut completed = Vec::new();
        for (i, (_, handle)) in reply_tasks.iter().enumerate() {
            if handle.is_finished() {
                completed.push(i);
            }
        }
        let mut finished: Vec<ReplyTask> = completed
            .into_iter()
            .rev()
            .map(|i| reply_tasks.remove(i))
            .collect();
        // Replies finishing in the same pass are applied oldest first
        finished.reverse();
        for (request_id, handle) in finished {
            let outcome = handle.await.unwrap_or_else(|e| {
                Err(RequestFailure::Transport(format!("request task failed: {e}")))
            });
            app.receive_reply(request_id, outcome);
        }

        if app.should_quit {
            for (request_id, handle) in reply_tasks {
                tracing::debug!(request_id, "abandoning request on quit");
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Run one request on a background task.
fn spawn_request(client: &ChatClient, request: OutboundRequest) -> ReplyTask {
    let client = client.clone();
    let request_id = request.request_id;
    let handle = tokio::spawn(async move { client.send(&request).await });
    (request_id, handle)
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
