//! Append-only conversation transcript.

use crate::message::Message;
use crate::render::Transcript;
use serde::Serialize;

/// Greeting used for the initial system message.
pub const DEFAULT_GREETING: &str = "Ask about DB";

/// Ordered, append-only sequence of messages.
///
/// Insertion order is display order. The only way to grow a conversation is
/// [`Conversation::append`], which consumes the old value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create a conversation holding a single system greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(greeting)],
        }
    }

    /// Return this conversation with `message` appended.
    #[must_use]
    pub fn append(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// All messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Render the transcript, one row per message.
    pub fn render(&self) -> Transcript<'_> {
        Transcript::new(&self.messages)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}
