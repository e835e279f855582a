//! Logging interceptor — info-level request/response text logging.
//!
//! Purely observational: both hooks return the value they were given,
//! untouched.

use async_trait::async_trait;
use tracing::info;

use relai_core::error::HookError;
use relai_core::request::{ChatRequest, ChatResponse};

use crate::interceptor::{Interceptor, RequestHook, ResponseHook};

/// Logs the single-turn user prompt and the model reply.
pub struct LoggingInterceptor {
    priority: i32,
}

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self { priority: 0 }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "logger"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn request_hook(&self) -> Option<&dyn RequestHook> {
        Some(self)
    }

    fn response_hook(&self) -> Option<&dyn ResponseHook> {
        Some(self)
    }
}

#[async_trait]
impl RequestHook for LoggingInterceptor {
    async fn on_request(&self, request: ChatRequest) -> Result<ChatRequest, HookError> {
        info!(user_text = %request.user_text, "AI request");
        Ok(request)
    }
}

#[async_trait]
impl ResponseHook for LoggingInterceptor {
    async fn on_response(
        &self,
        _request: &ChatRequest,
        response: ChatResponse,
    ) -> Result<ChatResponse, HookError> {
        info!(text = %response.text, "AI response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_passes_through_unchanged() {
        let logger = LoggingInterceptor::new();
        let request = ChatRequest::new("hello").with_param("k", serde_json::json!(1));

        let out = logger.on_request(request.clone()).await.unwrap();
        assert_eq!(out, request);
    }

    #[tokio::test]
    async fn response_passes_through_unchanged() {
        let logger = LoggingInterceptor::new();
        let request = ChatRequest::new("hello");
        let response = ChatResponse::new("hi there");

        let out = logger.on_response(&request, response.clone()).await.unwrap();
        assert_eq!(out, response);
    }

    #[test]
    fn exposes_both_hooks() {
        let logger = LoggingInterceptor::new().with_priority(-5);
        assert_eq!(logger.name(), "logger");
        assert_eq!(logger.priority(), -5);
        assert!(logger.request_hook().is_some());
        assert!(logger.response_hook().is_some());
    }
}
