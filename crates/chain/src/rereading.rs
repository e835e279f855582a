//! Re-reading (Re2) interceptor — prompt rewrite for better reasoning.
//!
//! Re2 has the model read the question twice: the rewritten prompt is the
//! original text, a re-reading cue, and the original text again. The
//! pre-rewrite text is preserved under a reserved parameter so later
//! interceptors and tests can recover it. Request-only; responses pass by
//! untouched.

use async_trait::async_trait;

use relai_core::error::HookError;
use relai_core::request::ChatRequest;

use crate::interceptor::{Interceptor, RequestHook};

/// Parameter key under which the pre-rewrite user text is preserved.
pub const ORIGINAL_QUERY_KEY: &str = "re2_input_query";

/// The literal cue inserted between the two readings.
pub const RE_READ_CUE: &str = "Read the question again:";

/// Rewrites the user text into the two-occurrence Re2 template.
pub struct ReReadingInterceptor {
    priority: i32,
}

impl ReReadingInterceptor {
    pub fn new() -> Self {
        Self { priority: 0 }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for ReReadingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for ReReadingInterceptor {
    fn name(&self) -> &str {
        "re_reading"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn request_hook(&self) -> Option<&dyn RequestHook> {
        Some(self)
    }
}

#[async_trait]
impl RequestHook for ReReadingInterceptor {
    async fn on_request(&self, request: ChatRequest) -> Result<ChatRequest, HookError> {
        let original = request.user_text.clone();
        let rewritten = format!("{original}\n{RE_READ_CUE} {original}");

        Ok(request
            .with_param(ORIGINAL_QUERY_KEY, original.into())
            .with_user_text(rewritten))
    }
}
