//! HTTP client for the chat endpoint.
//!
//! One POST per submission, no retries. Every failure (transport, timeout,
//! non-2xx status) collapses into a [`RequestFailure`] whose display text is
//! what the transcript shows.

use crate::config::Config;
use crate::message::MessageContent;
use crate::view::OutboundRequest;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Maximum number of characters of a raw error body kept in a failure.
const MAX_DETAIL_CHARS: usize = 200;

/// Errors that can occur while talking to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestFailure {
    /// Connection, TLS, or body read error.
    #[error("{0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}{}", detail_suffix(.detail.as_deref()))]
    Status {
        status: u16,
        detail: Option<String>,
    },
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

/// JSON body sent to the endpoint.
#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    message: &'a str,
}

/// Client for the chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl ChatClient {
    /// Create a client posting to `endpoint`.
    ///
    /// Without a timeout a request waits as long as the server does.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Create a client from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one question and decode the reply.
    pub async fn send(&self, request: &OutboundRequest) -> Result<MessageContent, RequestFailure> {
        tracing::debug!(
            request_id = request.request_id,
            endpoint = %self.endpoint,
            "sending chat request"
        );

        let result = self.post(&request.message).await;
        match &result {
            Ok(_) => tracing::debug!(request_id = request.request_id, "chat request succeeded"),
            Err(e) => tracing::warn!(request_id = request.request_id, error = %e, "chat request failed"),
        }
        result
    }

    async fn post(&self, message: &str) -> Result<MessageContent, RequestFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequestBody { message })
            .send()
            .await
            .map_err(|e| self.map_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_error(&e))?;

        if status.is_success() {
            Ok(MessageContent::from_reply_text(&body))
        } else {
            Err(RequestFailure::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
            })
        }
    }

    fn map_error(&self, error: &reqwest::Error) -> RequestFailure {
        if error.is_timeout() {
            let secs = self.timeout.map_or(0, |t| t.as_secs());
            return RequestFailure::Timeout(secs);
        }
        RequestFailure::Transport(error_chain(error))
    }
}

/// Join an error with its sources, e.g.
/// `error sending request: client error (Connect): Connection refused`.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut description = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}

/// Pull a human-readable detail out of an error body.
///
/// JSON objects with a `detail` field (FastAPI style) yield that field;
/// anything else yields the trimmed body, truncated.
fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) {
        if let Some(detail) = object.get("detail") {
            return Some(match detail {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
    }

    let mut detail: String = trimmed.chars().take(MAX_DETAIL_CHARS).collect();
    if trimmed.chars().count() > MAX_DETAIL_CHARS {
        detail.push_str("...");
    }
    Some(detail)
}
