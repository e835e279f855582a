//! In-memory conversation store — useful for testing and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use relai_core::error::StoreError;
use relai_core::message::{ConversationId, Message};
use relai_core::store::ConversationStore;

/// A conversation store that keeps everything in a map. Nothing survives the
/// process; appends for the same id are serialized by the write lock.
pub struct InMemoryStore {
    conversations: Arc<RwLock<HashMap<String, Vec<Message>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn append(
        &self,
        id: &ConversationId,
        messages: Vec<Message>,
    ) -> Result<(), StoreError> {
        if messages.is_empty() {
            return Ok(());
        }
        self.conversations
            .write()
            .await
            .entry(id.0.clone())
            .or_default()
            .extend(messages);
        Ok(())
    }

    async fn get(&self, id: &ConversationId, last_n: usize) -> Result<Vec<Message>, StoreError> {
        if last_n == 0 {
            return Ok(Vec::new());
        }
        let conversations = self.conversations.read().await;
        let Some(history) = conversations.get(&id.0) else {
            return Ok(Vec::new());
        };
        let skip = history.len().saturating_sub(last_n);
        Ok(history[skip..].to_vec())
    }

    async fn clear(&self, id: &ConversationId) -> Result<(), StoreError> {
        self.conversations.write().await.remove(&id.0);
        Ok(())
    }
}
