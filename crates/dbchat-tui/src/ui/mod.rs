//! UI module for the dbchat TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::{centered_fixed, chat_layout};
