//! Memory interceptor — conversation history injection and persistence.
//!
//! Before the call, reads the most recent messages for the request's
//! conversation from the store and injects them under [`HISTORY_KEY`] for
//! the invoker to consume as dialogue history. After the call, appends the
//! turn's user and assistant messages. This is the only interceptor that
//! mutates external state.
//!
//! A store read failure degrades to an empty history with a warning rather
//! than aborting the turn; a store write failure surfaces on the
//! observation-error path, where the response has already been produced and
//! is still delivered.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use relai_core::error::HookError;
use relai_core::message::Message;
use relai_core::request::{ChatRequest, ChatResponse};
use relai_core::store::ConversationStore;

use crate::interceptor::{Interceptor, RequestHook, ResponseHook};

/// Parameter key under which retrieved history is injected, as a JSON array
/// of messages.
pub const HISTORY_KEY: &str = "chat_memory_history";

/// Wires a [`ConversationStore`] into the chain.
pub struct MemoryInterceptor {
    store: Arc<dyn ConversationStore>,
    priority: i32,
}

impl MemoryInterceptor {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store, priority: 0 }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Interceptor for MemoryInterceptor {
    fn name(&self) -> &str {
        "chat_memory"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn request_hook(&self) -> Option<&dyn RequestHook> {
        Some(self)
    }

    fn response_hook(&self) -> Option<&dyn ResponseHook> {
        Some(self)
    }
}

#[async_trait]
impl RequestHook for MemoryInterceptor {
    async fn on_request(&self, request: ChatRequest) -> Result<ChatRequest, HookError> {
        let id = request.conversation_id();
        let window = request.retrieve_size();

        let history = match self.store.get(&id, window).await {
            Ok(history) => history,
            Err(e) => {
                warn!(
                    conversation_id = %id,
                    error = %e,
                    "History retrieval failed, continuing with empty history"
                );
                Vec::new()
            }
        };

        debug!(
            conversation_id = %id,
            window,
            injected = history.len(),
            "Injected conversation history"
        );

        let history = serde_json::to_value(&history)?;
        Ok(request.with_param(HISTORY_KEY, history))
    }
}

#[async_trait]
impl ResponseHook for MemoryInterceptor {
    async fn on_response(
        &self,
        request: &ChatRequest,
        response: ChatResponse,
    ) -> Result<ChatResponse, HookError> {
        let id = request.conversation_id();
        let turn = vec![
            Message::user(&request.user_text),
            Message::assistant(&response.text),
        ];
        self.store.append(&id, turn).await?;

        debug!(conversation_id = %id, "Persisted conversation turn");
        Ok(response)
    }
}
