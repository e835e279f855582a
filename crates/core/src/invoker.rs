//! Invoker trait — the abstraction over the model backend.
//!
//! An Invoker knows how to turn a finalized request into a response, either
//! as one complete value or as a stream of chunks. The chain calls `invoke()`
//! or `invoke_stream()` without knowing which backend is behind the trait.

use async_trait::async_trait;

use crate::error::InvokeError;
use crate::request::{ChatRequest, ChatResponse, ResponseChunk};

/// A lazy, finite, non-restartable sequence of response chunks.
///
/// The stream ends when the channel closes; an `Err` item terminates it
/// early.
pub type ChunkStream = tokio::sync::mpsc::Receiver<Result<ResponseChunk, InvokeError>>;

/// The terminal capability of a chain: the thing that actually produces a
/// response.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// A human-readable name for this invoker (for diagnostics).
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn invoke(&self, request: ChatRequest) -> Result<ChatResponse, InvokeError>;

    /// Send a request and get a stream of response chunks.
    ///
    /// Default implementation calls `invoke()` and emits the result as a
    /// single chunk.
    async fn invoke_stream(&self, request: ChatRequest) -> Result<ChunkStream, InvokeError> {
        let response = self.invoke(request).await?;
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        let _ = tx.send(Ok(ResponseChunk::new(response.text))).await;
        Ok(rx)
    }
}
