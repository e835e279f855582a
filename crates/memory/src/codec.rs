//! Conversation codecs.
//!
//! A codec turns a full conversation into bytes and back. Each store owns
//! its codec instance, injected at construction — there is no process-wide
//! serializer state, so a store under test can be given whatever codec the
//! test needs.

use relai_core::error::StoreError;
use relai_core::message::Message;

/// Encodes a full conversation to bytes and back.
pub trait ConversationCodec: Send + Sync {
    /// The codec name (e.g., "json").
    fn name(&self) -> &str;

    fn encode(&self, messages: &[Message]) -> Result<Vec<u8>, StoreError>;

    /// Decode failures mean the persisted entry is corrupt, never that the
    /// caller passed bad input.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Message>, StoreError>;
}

/// JSON codec — human-inspectable on disk.
pub struct JsonCodec;

impl ConversationCodec for JsonCodec {
    fn name(&self) -> &str {
        "json"
    }

    fn encode(&self, messages: &[Message]) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(messages).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Message>, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
    }
}
