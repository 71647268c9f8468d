//! Conversation view state and its update function.
//!
//! The view owns the conversation and is moved through [`ConversationView::update`]:
//! every event yields the next view plus, at most, one effect for the front
//! end to run. The view never performs I/O itself.

use crate::client::RequestFailure;
use crate::conversation::Conversation;
use crate::message::{Message, MessageContent};
use std::collections::BTreeSet;

/// A question waiting to be posted to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Identifier echoed back in [`ViewEvent::ReplyReceived`].
    pub request_id: u64,
    /// The question text.
    pub message: String,
}

/// Events fed into the view.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The user submitted a draft.
    Submit { draft: String },
    /// A request finished, successfully or not.
    ReplyReceived {
        request_id: u64,
        outcome: Result<MessageContent, RequestFailure>,
    },
}

/// Side effects requested by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post this request and report back with [`ViewEvent::ReplyReceived`].
    Send(OutboundRequest),
}

/// State of the conversation view.
#[derive(Debug, Clone)]
pub struct ConversationView {
    conversation: Conversation,
    next_request_id: u64,
    pending: BTreeSet<u64>,
}

impl ConversationView {
    /// Create a view whose transcript starts with `greeting`.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            conversation: Conversation::new(greeting),
            next_request_id: 0,
            pending: BTreeSet::new(),
        }
    }

    /// The current transcript.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Number of requests still waiting for a reply.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Apply an event, returning the next view and an optional effect.
    #[must_use]
    pub fn update(self, event: ViewEvent) -> (Self, Option<Effect>) {
        match event {
            ViewEvent::Submit { draft } => self.submit(draft),
            ViewEvent::ReplyReceived {
                request_id,
                outcome,
            } => (self.receive(request_id, outcome), None),
        }
    }

    fn submit(mut self, draft: String) -> (Self, Option<Effect>) {
        if draft.is_empty() {
            return (self, None);
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending.insert(request_id);
        self.conversation = self.conversation.append(Message::user(draft.clone()));

        tracing::debug!(request_id, in_flight = self.pending.len(), "question submitted");

        let effect = Effect::Send(OutboundRequest {
            request_id,
            message: draft,
        });
        (self, Some(effect))
    }

    fn receive(
        mut self,
        request_id: u64,
        outcome: Result<MessageContent, RequestFailure>,
    ) -> Self {
        if !self.pending.remove(&request_id) {
            tracing::warn!(request_id, "ignoring reply for unknown request");
            return self;
        }

        if self.pending.first().is_some_and(|&oldest| oldest < request_id) {
            tracing::debug!(request_id, "reply arrived before an earlier request");
        }

        let content = outcome.unwrap_or_else(|failure| MessageContent::error(failure.to_string()));
        self.conversation = self
            .conversation
            .append(Message::assistant(content, request_id));
        self
    }
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new(crate::conversation::DEFAULT_GREETING)
    }
}
