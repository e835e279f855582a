//! The Interceptor trait and its hook capabilities.
//!
//! An interceptor is a named, priority-ordered unit that may carry a
//! pre-call hook, a post-call hook, or both. The chain checks which
//! capabilities are present rather than dispatching on concrete types, so a
//! request-only interceptor simply leaves `response_hook` at its `None`
//! default.

use async_trait::async_trait;

use relai_core::error::HookError;
use relai_core::request::{ChatRequest, ChatResponse};

/// Pre-call capability: a pure request transformation.
#[async_trait]
pub trait RequestHook: Send + Sync {
    /// Produce the request to pass to the next interceptor (or the invoker).
    /// Implementations must not mutate shared state through the request;
    /// they return a new value.
    async fn on_request(&self, request: ChatRequest) -> Result<ChatRequest, HookError>;
}

/// Post-call capability: observe or transform a completed response.
#[async_trait]
pub trait ResponseHook: Send + Sync {
    /// Runs once per execution against the complete response — immediately
    /// after the invoker in single-shot mode, after aggregation in streaming
    /// mode.
    ///
    /// `request` is the final pre-call request, read-only, for hooks that
    /// need call context (e.g. which conversation this turn belongs to).
    /// Hooks that only observe must return the response unchanged.
    async fn on_response(
        &self,
        request: &ChatRequest,
        response: ChatResponse,
    ) -> Result<ChatResponse, HookError>;
}

/// A registered unit in the chain.
pub trait Interceptor: Send + Sync {
    /// Stable identifier, used in diagnostics and error attribution.
    fn name(&self) -> &str;

    /// Lower values run earlier on the pre-call path. Post-call hooks run in
    /// the same ascending order. Ties keep registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// The pre-call capability, if this interceptor has one.
    fn request_hook(&self) -> Option<&dyn RequestHook> {
        None
    }

    /// The post-call capability, if this interceptor has one.
    fn response_hook(&self) -> Option<&dyn ResponseHook> {
        None
    }
}
