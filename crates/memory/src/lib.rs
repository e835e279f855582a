//! Conversation store implementations for relai.

pub mod codec;
pub mod file_store;
pub mod in_memory;
pub mod settings;

pub use codec::{ConversationCodec, JsonCodec};
pub use file_store::FileStore;
pub use in_memory::InMemoryStore;
pub use settings::StoreSettings;
