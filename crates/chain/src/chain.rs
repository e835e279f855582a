//! The chain driver.
//!
//! A `Chain` holds an ordered list of interceptors around a terminal
//! invoker. Execution is a fold: each pre-call hook receives the previous
//! hook's request, the invoker receives the final request, and each
//! post-call hook receives the previous hook's response — in the **same**
//! ascending priority order on both sides. An interceptor registered first
//! both rewrites the request first and observes the response first.

use std::sync::Arc;

use tracing::{debug, warn};

use relai_core::error::{ChainError, ObservationError};
use relai_core::invoker::{ChunkStream, Invoker};
use relai_core::request::{ChatRequest, ChatResponse};

use crate::aggregator;
use crate::interceptor::Interceptor;

/// The result of a single-shot execution: the response, plus the non-fatal
/// failure of a post-call hook if one occurred. An observation failure never
/// erases a successful answer.
#[derive(Debug)]
pub struct ChatOutcome {
    pub response: ChatResponse,
    pub observation_error: Option<ObservationError>,
}

/// An ordered interceptor chain around a terminal invoker.
///
/// Registration happens once at construction; afterwards the interceptor
/// list is read-only, so concurrent executions against the same chain share
/// no mutable state.
pub struct Chain {
    invoker: Arc<dyn Invoker>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Chain {
    /// Create a chain with no interceptors around the given invoker.
    pub fn new(invoker: Arc<dyn Invoker>) -> Self {
        Self {
            invoker,
            interceptors: Vec::new(),
        }
    }

    /// Register one interceptor. The list is kept sorted by ascending
    /// priority; the sort is stable, so equal priorities keep registration
    /// order.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self.interceptors.sort_by_key(|i| i.priority());
        self
    }

    /// Register several interceptors at once.
    pub fn with_interceptors(
        mut self,
        interceptors: impl IntoIterator<Item = Arc<dyn Interceptor>>,
    ) -> Self {
        for interceptor in interceptors {
            self = self.with_interceptor(interceptor);
        }
        self
    }

    /// Number of registered interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the chain has no interceptors.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Fold the request through every pre-call hook in ascending order.
    async fn transform_request(&self, mut request: ChatRequest) -> Result<ChatRequest, ChainError> {
        for interceptor in &self.interceptors {
            let Some(hook) = interceptor.request_hook() else {
                continue;
            };
            request =
                hook.on_request(request)
                    .await
                    .map_err(|source| ChainError::RequestTransform {
                        interceptor: interceptor.name().to_string(),
                        source,
                    })?;
        }
        Ok(request)
    }

    /// Run a single-shot execution.
    ///
    /// A pre-call hook failure aborts before the invoker is reached; an
    /// invoker failure skips all post-call hooks. A post-call hook failure
    /// skips the remaining hooks but still returns the response, with the
    /// failure attached to the outcome.
    pub async fn execute(&self, request: ChatRequest) -> Result<ChatOutcome, ChainError> {
        let request = self.transform_request(request).await?;

        debug!(invoker = self.invoker.name(), "Invoking model backend");
        let response = self.invoker.invoke(request.clone()).await?;

        let (response, observation_error) =
            run_response_hooks(&self.interceptors, &request, response).await;
        Ok(ChatOutcome {
            response,
            observation_error,
        })
    }

    /// Run a streaming execution.
    ///
    /// Chunks are forwarded to the caller as soon as the invoker produces
    /// them. Post-call hooks run exactly once, on a background task, against
    /// the aggregated response after the stream ends cleanly; a hook failure
    /// there is logged, since the chunks are already delivered.
    pub async fn execute_stream(&self, request: ChatRequest) -> Result<ChunkStream, ChainError> {
        let request = self.transform_request(request).await?;

        debug!(
            invoker = self.invoker.name(),
            "Invoking model backend (streaming)"
        );
        let upstream = self.invoker.invoke_stream(request.clone()).await?;

        let interceptors = self.interceptors.clone();
        Ok(aggregator::aggregate_stream(upstream, move |response| {
            async move {
                let _ = run_response_hooks(&interceptors, &request, response).await;
            }
        }))
    }
}

/// Fold the response through every post-call hook, ascending order. On the
/// first failure the remaining hooks are skipped and the last good response
/// is kept; the failure is logged here and handed back for attachment.
async fn run_response_hooks(
    interceptors: &[Arc<dyn Interceptor>],
    request: &ChatRequest,
    mut response: ChatResponse,
) -> (ChatResponse, Option<ObservationError>) {
    for interceptor in interceptors {
        let Some(hook) = interceptor.response_hook() else {
            continue;
        };
        match hook.on_response(request, response.clone()).await {
            Ok(next) => response = next,
            Err(source) => {
                let error = ObservationError {
                    interceptor: interceptor.name().to_string(),
                    source,
                };
                warn!(
                    interceptor = interceptor.name(),
                    error = %error,
                    "Response observation failed, skipping remaining hooks"
                );
                return (response, Some(error));
            }
        }
    }
    (response, None)
}
