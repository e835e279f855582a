//! # relai Chain
//!
//! The interceptor chain: an ordered set of named units that rewrite an
//! outgoing [`ChatRequest`](relai_core::ChatRequest) and/or observe the
//! completed [`ChatResponse`](relai_core::ChatResponse) around a terminal
//! [`Invoker`](relai_core::Invoker) call, in single-shot and streaming
//! modes.
//!
//! Built-in interceptors:
//! - [`LoggingInterceptor`] — logs request and response text, changes nothing
//! - [`ReReadingInterceptor`] — Re2 prompt rewrite for better reasoning
//! - [`MemoryInterceptor`] — injects and persists conversation history

pub mod aggregator;
pub mod chain;
pub mod interceptor;
pub mod logging;
pub mod memory;
pub mod rereading;

pub use aggregator::aggregate_stream;
pub use chain::{Chain, ChatOutcome};
pub use interceptor::{Interceptor, RequestHook, ResponseHook};
pub use logging::LoggingInterceptor;
pub use memory::{MemoryInterceptor, HISTORY_KEY};
pub use rereading::{ReReadingInterceptor, ORIGINAL_QUERY_KEY, RE_READ_CUE};
