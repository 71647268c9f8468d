//! Reusable widgets for the dbchat TUI.

pub mod status_bar;
pub mod text_input;
pub mod transcript;

pub use status_bar::{KeyHint, StatusBar};
pub use text_input::{TextInput, TextInputState};
pub use transcript::{transcript_lines, TranscriptView};
