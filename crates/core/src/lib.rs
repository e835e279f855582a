//! # relai Core
//!
//! Domain types, traits, and error definitions for the relai chat pipeline.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod invoker;
pub mod message;
pub mod request;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{ChainError, Error, HookError, InvokeError, ObservationError, Result, StoreError};
pub use invoker::{ChunkStream, Invoker};
pub use message::{ConversationId, Message, Role};
pub use request::{ChatRequest, ChatResponse, ResponseChunk};
pub use store::ConversationStore;
