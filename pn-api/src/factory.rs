//! Builds resilient API clients by composing transport middleware.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::middleware::{LoggingMiddleware, Middleware, MiddlewareStack, RetryMiddleware};
use crate::transport::Transport;

/// Composes a base client with retry and optional request logging.
pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Decorate `client` with a resilient execution path.
    ///
    /// Retry is always installed, configured with `max_retries`; the
    /// logging tap is added only when `log_requests` is set and sits inside
    /// the retry loop so each attempt is observed. The concurrency ceiling
    /// is applied to the client, the composed stack becomes its transport,
    /// and the same instance is handed back.
    pub fn build(
        mut client: ApiClient,
        transport: Arc<dyn Transport>,
        max_retries: u32,
        max_concurrent: usize,
        log_requests: bool,
    ) -> ApiClient {
        let mut middlewares: Vec<Arc<dyn Middleware>> =
            vec![Arc::new(RetryMiddleware::new(max_retries))];
        if log_requests {
            middlewares.push(Arc::new(LoggingMiddleware::new()));
        }

        client.set_concurrency(max_concurrent);
        client.set_transport(Arc::new(MiddlewareStack::new(transport, middlewares)));
        client
    }
}
