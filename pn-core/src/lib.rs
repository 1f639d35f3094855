//! PostNL Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other SDK crates:
//! - SDK configuration (base URL, credentials, HTTP behavior)
//! - Global error types covering all error categories
//! - Structured logging with tracing
//! - Platform detection utilities
//! - Common constants

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;

// Re-export commonly used items at the crate root
pub use config::ApiConfig;
pub use error::{PnError, PnResult};
pub use logging::init_logging;
pub use platform::Platform;
