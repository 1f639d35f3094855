//! Async HTTP transport seam.
//!
//! `Transport` is the capability the middleware chain and the client are
//! written against; `ReqwestTransport` is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use pn_core::constants;
use pn_core::error::{PnError, PnResult};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One outgoing HTTP request.
///
/// Cloneable so the retry middleware can re-issue an attempt.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl TransportRequest {
    /// Create a request with the default timeout and no headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: Duration::from_millis(constants::DEFAULT_API_TIMEOUT_MS),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, url).json(body)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Add a header pair.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One received HTTP response, fully buffered.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response body as text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> PnResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| PnError::Serialization(format!("failed to parse response: {e}")))
    }
}

/// Async transport capability: executes one request, returns one response.
///
/// Cancellation and timeouts are the implementation's concern and pass
/// through untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> PnResult<TransportResponse>;
}

/// Production transport backed by `reqwest` with connection pooling.
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the underlying reqwest client.
    ///
    /// `accept_self_signed_certs` disables certificate verification and is
    /// meant for test setups only.
    pub fn new(accept_self_signed_certs: bool) -> PnResult<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30));

        if accept_self_signed_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder
            .build()
            .map_err(|e| PnError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> PnResult<TransportResponse> {
        let mut builder = self
            .inner
            .request(request.method.clone(), &request.url)
            .timeout(request.timeout);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify_error)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| PnError::Http(format!("failed to read response body: {e}")))?
            .to_vec();

        Ok(TransportResponse { status, headers, body })
    }
}

/// Classify a reqwest error into a PnError variant.
fn classify_error(e: reqwest::Error) -> PnError {
    if e.is_timeout() {
        PnError::Timeout(e.to_string())
    } else if e.is_connect() {
        PnError::Connection(e.to_string())
    } else {
        PnError::Http(e.to_string())
    }
}
