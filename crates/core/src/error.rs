//! Error types for the relai domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; fatal chain errors are kept
//! strictly separate from non-fatal observation failures so a valid response
//! can never be masked by a hook that merely watched it.

use thiserror::Error;

/// The top-level error type for all relai operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Chain errors (fatal: no response exists) ---
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Fatal errors while driving an interceptor chain. When one of these is
/// returned, the caller receives no response at all.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A pre-call hook failed. The request never reached the invoker.
    #[error("Request transform failed in interceptor '{interceptor}': {source}")]
    RequestTransform {
        interceptor: String,
        #[source]
        source: HookError,
    },

    /// The terminal invoker failed. No response was produced, so post-call
    /// hooks are skipped.
    #[error("Invocation failed: {0}")]
    Invocation(#[from] InvokeError),
}

/// A post-call hook failed after a valid response already existed.
///
/// Non-fatal by contract: the chain carries this alongside the response
/// instead of returning it in place of the response.
#[derive(Debug, Error)]
#[error("Response observation failed in interceptor '{interceptor}': {source}")]
pub struct ObservationError {
    /// Name of the interceptor whose response hook failed.
    pub interceptor: String,
    #[source]
    pub source: HookError,
}

/// Error raised by an individual interceptor hook.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors from a conversation store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    /// A persisted conversation could not be decoded. Stores recover from
    /// this locally by treating the entry as absent; the variant exists for
    /// codecs to report the condition.
    #[error("Persisted conversation is undecodable: {0}")]
    Corrupt(String),

    #[error("Failed to encode conversation: {0}")]
    Encode(String),
}

/// Errors from the terminal invoker (the model backend).
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Invoker not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}
