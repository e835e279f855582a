//! Request, response, and stream-chunk value types.
//!
//! `ChatRequest` and `ChatResponse` are value-like by contract: every
//! "mutation" helper returns a fresh value and leaves the receiver untouched.
//! This is what lets the chain be a plain fold that can be replayed in tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::ConversationId;

/// Parameter key carrying the conversation identifier for memory-aware calls.
pub const CONVERSATION_ID_KEY: &str = "chat_memory_conversation_id";

/// Parameter key carrying the recency window size (how many recent messages
/// to retrieve from the conversation store).
pub const RETRIEVE_SIZE_KEY: &str = "chat_memory_retrieve_size";

/// Conversation used when no identifier parameter is supplied.
pub const DEFAULT_CONVERSATION_ID: &str = "default";

/// Recency window used when no size parameter is supplied.
pub const DEFAULT_RETRIEVE_SIZE: usize = 10;

/// An outgoing request to the model backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user-facing prompt text.
    pub user_text: String,

    /// System-level instruction text.
    #[serde(default)]
    pub system_text: String,

    /// Named parameters carrying cross-interceptor context (conversation id,
    /// recency window, preserved pre-rewrite text, injected history, ...).
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub params: serde_json::Map<String, Value>,
}

impl ChatRequest {
    /// Create a request with the given user text and no parameters.
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            system_text: String::new(),
            params: serde_json::Map::new(),
        }
    }

    /// Copy of this request with the user text replaced.
    pub fn with_user_text(&self, user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            ..self.clone()
        }
    }

    /// Copy of this request with the system text replaced.
    pub fn with_system_text(&self, system_text: impl Into<String>) -> Self {
        Self {
            system_text: system_text.into(),
            ..self.clone()
        }
    }

    /// Copy of this request with one parameter added or replaced. The
    /// receiver's parameter map is never mutated.
    pub fn with_param(&self, key: impl Into<String>, value: Value) -> Self {
        let mut params = self.params.clone();
        params.insert(key.into(), value);
        Self {
            params,
            ..self.clone()
        }
    }

    /// Look up a parameter by key.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// The conversation this request belongs to, from
    /// [`CONVERSATION_ID_KEY`], or [`DEFAULT_CONVERSATION_ID`] if absent.
    pub fn conversation_id(&self) -> ConversationId {
        match self.param(CONVERSATION_ID_KEY).and_then(Value::as_str) {
            Some(id) => ConversationId::from(id),
            None => ConversationId::from(DEFAULT_CONVERSATION_ID),
        }
    }

    /// The recency window from [`RETRIEVE_SIZE_KEY`], defaulting to
    /// [`DEFAULT_RETRIEVE_SIZE`]. Negative values clamp to zero.
    pub fn retrieve_size(&self) -> usize {
        match self.param(RETRIEVE_SIZE_KEY).and_then(Value::as_i64) {
            Some(n) => n.max(0) as usize,
            None => DEFAULT_RETRIEVE_SIZE,
        }
    }
}

/// A complete response from the model backend. One logical response per
/// chain execution, regardless of streaming mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated output text.
    pub text: String,

    /// Structured result fields produced by the invoker (model name, token
    /// usage, finish reason, ...).
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, Value>,
}

impl ChatResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Copy of this response with the text replaced.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }
}

/// One incremental piece of a streamed response. Not meaningful in
/// isolation; the full response is the in-order concatenation of chunk
/// contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseChunk {
    /// Partial content delta.
    pub content: String,
}

impl ResponseChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
