//! PostNL API - HTTP client for the carrier REST API.
//!
//! This crate provides the resilient transport layer of the SDK: an async
//! transport seam, cross-cutting middleware (retry with exponential
//! backoff, request/response logging), a factory composing them around a
//! base client with bounded concurrency, and typed endpoint methods that
//! deserialize responses into `pn-models` collections.

pub mod client;
pub mod endpoints;
pub mod factory;
pub mod middleware;
pub mod transport;

// Re-export key types
pub use client::ApiClient;
pub use factory::HttpClientFactory;
pub use middleware::{LoggingMiddleware, Middleware, MiddlewareStack, Next, RetryMiddleware};
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
