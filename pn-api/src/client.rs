//! HTTP client for the carrier REST API.
//!
//! Handles authentication headers, timeout management, bounded request
//! concurrency, and the request/response lifecycle. Resilience (retry,
//! request logging) comes from the middleware stack installed by
//! [`HttpClientFactory`](crate::factory::HttpClientFactory).

use std::sync::Arc;
use std::time::Duration;

use pn_core::config::ApiConfig;
use pn_core::constants;
use pn_core::error::{PnError, PnResult};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::factory::HttpClientFactory;
use crate::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};

/// HTTP client for communicating with the carrier API.
///
/// Wraps a pluggable async transport with API-key authentication, header
/// injection, and a ceiling on concurrent in-flight requests.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    /// Base URL for the API (e.g. "https://api.postnl.nl").
    api_root: String,
    /// API key sent in the `apikey` header on every request.
    api_key: String,
    /// Default request timeout.
    timeout: Duration,
    /// Custom headers from configuration.
    custom_headers: Vec<(String, String)>,
    /// Bounds concurrent in-flight requests.
    limiter: Arc<Semaphore>,
    max_concurrent: usize,
}

impl ApiClient {
    /// Create a client with a bare transport and default concurrency.
    ///
    /// The result issues requests without retry or logging; pass it through
    /// [`HttpClientFactory::build`](crate::factory::HttpClientFactory::build)
    /// (or use [`from_config`](Self::from_config)) for the resilient path.
    pub fn new(config: &ApiConfig) -> PnResult<Self> {
        let transport = ReqwestTransport::new(config.server.accept_self_signed_certs)?;

        let mut custom_headers: Vec<(String, String)> = config
            .server
            .custom_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        custom_headers.sort();

        Ok(Self {
            transport: Arc::new(transport),
            api_root: config.effective_base_url(),
            api_key: config.server.api_key.clone(),
            timeout: Duration::from_millis(config.server.api_timeout_ms),
            custom_headers,
            limiter: Arc::new(Semaphore::new(constants::DEFAULT_CONCURRENT_REQUESTS)),
            max_concurrent: constants::DEFAULT_CONCURRENT_REQUESTS,
        })
    }

    /// Create a fully decorated client from configuration: retry, optional
    /// request logging, and the configured concurrency ceiling.
    pub fn from_config(config: &ApiConfig) -> PnResult<Self> {
        let client = Self::new(config)?;
        let base = client.transport.clone();
        Ok(HttpClientFactory::build(
            client,
            base,
            config.http.max_retries,
            config.http.max_concurrent_requests,
            config.http.log_requests,
        ))
    }

    /// Get the current API root URL.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Current ceiling on concurrent in-flight requests.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Replace the async execution path.
    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    /// Replace the concurrency ceiling.
    pub fn set_concurrency(&mut self, max_concurrent: usize) {
        self.limiter = Arc::new(Semaphore::new(max_concurrent));
        self.max_concurrent = max_concurrent;
    }

    /// Internal: build a request for the given method, path, and optional
    /// JSON body, with auth and custom headers applied.
    fn build_request(&self, method: Method, path: &str, body: Option<Value>) -> TransportRequest {
        let mut request = TransportRequest::new(method, format!("{}{}", self.api_root, path))
            .timeout(self.timeout)
            .header("apikey", &self.api_key)
            .header("Accept", "application/json");
        for (key, value) in &self.custom_headers {
            request = request.header(key, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }

    /// Execute a request through the transport, bounded by the concurrency
    /// ceiling.
    pub async fn execute(&self, request: TransportRequest) -> PnResult<TransportResponse> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| PnError::Internal(format!("request limiter closed: {e}")))?;
        self.transport.execute(request).await
    }

    // --- Public HTTP methods ---

    /// Execute a GET request.
    pub async fn get(&self, path: &str) -> PnResult<TransportResponse> {
        debug!("GET {}", path);
        let request = self.build_request(Method::GET, path, None);
        let response = self.execute(request).await?;
        Self::check_status(response)
    }

    /// Execute a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: Value) -> PnResult<TransportResponse> {
        debug!("POST {}", path);
        let request = self.build_request(Method::POST, path, Some(body));
        let response = self.execute(request).await?;
        Self::check_status(response)
    }

    /// Execute a DELETE request.
    pub async fn delete(&self, path: &str) -> PnResult<TransportResponse> {
        debug!("DELETE {}", path);
        let request = self.build_request(Method::DELETE, path, None);
        let response = self.execute(request).await?;
        Self::check_status(response)
    }

    // --- Response helpers ---

    /// Convenience: GET + parse the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PnResult<T> {
        let response = self.get(path).await?;
        response.json()
    }

    /// Convenience: POST + parse the body as JSON.
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> PnResult<T> {
        let response = self.post(path, body).await?;
        response.json()
    }

    /// Check the HTTP status code and convert to PnError if needed.
    fn check_status(response: TransportResponse) -> PnResult<TransportResponse> {
        let status = response.status;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PnError::AuthFailed(format!("server returned {status}")));
        }

        if status.is_server_error() {
            return Err(PnError::ServerError {
                status: status.as_u16(),
                message: response.text(),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ApiConfig {
        let mut config = ApiConfig::default();
        config.server.base_url = "http://localhost:1234".into();
        config.server.api_key = "test-key".into();
        config
    }

    fn response(status: StatusCode, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            headers: vec![],
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_build_request_applies_auth_and_headers() {
        let mut config = test_config();
        config
            .server
            .custom_headers
            .insert("X-Custom".into(), "yes".into());
        let client = ApiClient::new(&config).unwrap();

        let request = client.build_request(Method::GET, "/shipment/v2/status", None);
        assert_eq!(request.url, "http://localhost:1234/shipment/v2/status");
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == "apikey" && v == "test-key"));
        assert!(request.headers.iter().any(|(k, _)| k == "X-Custom"));
    }

    #[test]
    fn test_default_concurrency() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.max_concurrent(), constants::DEFAULT_CONCURRENT_REQUESTS);
    }

    #[test]
    fn test_set_concurrency() {
        let mut client = ApiClient::new(&test_config()).unwrap();
        client.set_concurrency(2);
        assert_eq!(client.max_concurrent(), 2);
        assert_eq!(client.limiter.available_permits(), 2);
    }

    #[test]
    fn test_check_status_auth_failure() {
        let err = ApiClient::check_status(response(StatusCode::UNAUTHORIZED, "")).unwrap_err();
        assert!(matches!(err, PnError::AuthFailed(_)));

        let err = ApiClient::check_status(response(StatusCode::FORBIDDEN, "")).unwrap_err();
        assert!(matches!(err, PnError::AuthFailed(_)));
    }

    #[test]
    fn test_check_status_server_error() {
        let err =
            ApiClient::check_status(response(StatusCode::BAD_GATEWAY, "upstream down")).unwrap_err();
        match err {
            PnError::ServerError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_status_client_errors_pass_through() {
        let ok = ApiClient::check_status(response(StatusCode::BAD_REQUEST, "nope")).unwrap();
        assert_eq!(ok.status, StatusCode::BAD_REQUEST);
    }
}
