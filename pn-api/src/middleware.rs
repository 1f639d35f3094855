//! Cross-cutting transport middleware.
//!
//! A composed client runs every request through an ordered list of
//! middlewares wrapping the transport call. Each middleware may observe the
//! request, re-run the remainder of the chain (retry), or short-circuit
//! with its own result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pn_core::constants;
use pn_core::error::{PnError, PnResult};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::transport::{Transport, TransportRequest, TransportResponse};

/// One link in the transport middleware chain.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Handle a request, passing control on via `next.run(..)`.
    async fn handle(
        &self,
        request: TransportRequest,
        next: Next<'_>,
    ) -> PnResult<TransportResponse>;
}

/// Cursor over the remaining middleware chain, ending at the transport.
///
/// Copyable so a middleware can run the rest of the chain more than once.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    transport: &'a dyn Transport,
    middlewares: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, middlewares: &'a [Arc<dyn Middleware>]) -> Self {
        Self { transport, middlewares }
    }

    /// Run the remainder of the chain with the given request.
    pub async fn run(self, request: TransportRequest) -> PnResult<TransportResponse> {
        match self.middlewares.split_first() {
            Some((head, tail)) => {
                head.handle(request, Next { transport: self.transport, middlewares: tail })
                    .await
            }
            None => self.transport.execute(request).await,
        }
    }
}

/// An ordered middleware list wrapping a transport.
///
/// The composed stack is itself a transport, so decorated stacks compose.
pub struct MiddlewareStack {
    transport: Arc<dyn Transport>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareStack {
    pub fn new(transport: Arc<dyn Transport>, middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self { transport, middlewares }
    }
}

#[async_trait]
impl Transport for MiddlewareStack {
    async fn execute(&self, request: TransportRequest) -> PnResult<TransportResponse> {
        Next::new(&*self.transport, &self.middlewares).run(request).await
    }
}

/// Retries transient failures with exponential backoff.
///
/// A request is re-attempted on retryable errors (timeouts, connection
/// failures) and on retryable status codes, up to `max_retries` additional
/// attempts. The final response or error surfaces unchanged once attempts
/// are exhausted.
pub struct RetryMiddleware {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    retryable_statuses: Vec<u16>,
}

impl RetryMiddleware {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(constants::RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(constants::RETRY_MAX_DELAY_MS),
            retryable_statuses: constants::RETRYABLE_STATUS_CODES.to_vec(),
        }
    }

    /// Override the backoff timing (used to make tests fast).
    pub fn with_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Calculate retry delay with exponential backoff.
    fn delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64 << attempt);
        let max_ms = self.max_delay.as_millis() as u64;
        Duration::from_millis(delay_ms.min(max_ms))
    }
}

#[async_trait]
impl Middleware for RetryMiddleware {
    async fn handle(
        &self,
        request: TransportRequest,
        next: Next<'_>,
    ) -> PnResult<TransportResponse> {
        let mut last_error: Option<PnError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.delay(attempt - 1);
                warn!(
                    "retrying {} {} (attempt {}/{}) after {:.1}s",
                    request.method,
                    request.url,
                    attempt + 1,
                    self.max_retries + 1,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }

            match next.run(request.clone()).await {
                Ok(response) => {
                    let status = response.status.as_u16();
                    if self.retryable_statuses.contains(&status) && attempt < self.max_retries {
                        warn!("retryable status {} from {}", status, request.url);
                        last_error = Some(PnError::ServerError {
                            status,
                            message: format!("retryable status {}", response.status),
                        });
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if e.is_retryable() && attempt < self.max_retries {
                        warn!("retryable error on {}: {}", request.url, e);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PnError::Http("max retries exceeded".into())))
    }
}

/// Observes every request and response without altering them.
///
/// Each pass through the chain gets its own correlation id, so when this
/// sits inside the retry middleware every attempt is logged separately.
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        request: TransportRequest,
        next: Next<'_>,
    ) -> PnResult<TransportResponse> {
        let request_id = Uuid::new_v4();
        let started = std::time::Instant::now();
        debug!(%request_id, method = %request.method, url = %request.url, "dispatching request");

        match next.run(request).await {
            Ok(response) => {
                debug!(
                    %request_id,
                    status = response.status.as_u16(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request completed"
                );
                Ok(response)
            }
            Err(e) => {
                warn!(
                    %request_id,
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request failed"
                );
                Err(e)
            }
        }
    }
}
