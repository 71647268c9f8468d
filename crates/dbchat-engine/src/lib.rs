//! dbchat-engine: Headless core for the dbchat client
//!
//! This crate provides everything that does not touch a terminal:
//! - Message model and the append-only conversation
//! - Conversation view state with an explicit update function
//! - Render model shared by the TUI and plain-text output
//! - HTTP client for the chat endpoint
//! - Configuration

pub mod client;
pub mod config;
pub mod conversation;
pub mod message;
pub mod render;
pub mod view;

// Re-export commonly used types
pub use client::{ChatClient, RequestFailure};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use conversation::{Conversation, DEFAULT_GREETING};
pub use message::{Message, MessageContent, Role, StructuredResult};
pub use render::{cell_to_string, render_message, RenderedBody, RenderedMessage, Table, Transcript};
pub use view::{ConversationView, Effect, OutboundRequest, ViewEvent};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
