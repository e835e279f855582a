//! ConversationStore trait — durable per-conversation message history.
//!
//! Implementations: file-per-conversation (durable), in-memory (tests and
//! ephemeral sessions). Entries are created lazily on first append and
//! removed entirely by `clear`.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::message::{ConversationId, Message};

/// Durable mapping from conversation identifier to an ordered message
/// sequence.
///
/// The store is the only shared mutable resource in the pipeline. Appends to
/// the same identifier must be serialized by the implementation; operations
/// on different identifiers must not block one another.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The backend name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Append `messages` to the end of the conversation, creating it if
    /// needed. Once this returns Ok, the messages survive process restart
    /// (for durable backends). An empty batch is a no-op.
    async fn append(
        &self,
        id: &ConversationId,
        messages: Vec<Message>,
    ) -> Result<(), StoreError>;

    /// The last `min(last_n, total)` messages in chronological order.
    /// Empty for an unknown identifier or `last_n == 0`; never an error for
    /// an unknown identifier.
    async fn get(&self, id: &ConversationId, last_n: usize) -> Result<Vec<Message>, StoreError>;

    /// Remove all persisted state for the identifier. Idempotent: clearing
    /// an unknown conversation is a no-op.
    async fn clear(&self, id: &ConversationId) -> Result<(), StoreError>;
}
