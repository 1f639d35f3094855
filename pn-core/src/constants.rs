//! SDK-wide constants.

/// SDK name, used in the default User-Agent string.
pub const SDK_NAME: &str = "postnl-rs";

/// SDK version.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Production API base URL.
pub const PRODUCTION_API_URL: &str = "https://api.postnl.nl";

/// Sandbox API base URL.
pub const SANDBOX_API_URL: &str = "https://api-sandbox.postnl.nl";

/// Default API request timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Default number of retry attempts for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default ceiling on concurrent in-flight requests.
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

/// Base delay for exponential retry backoff, in milliseconds.
pub const RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Cap on the retry backoff delay, in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 4_000;

/// HTTP status codes that trigger a retry.
pub const RETRYABLE_STATUS_CODES: &[u16] = &[502, 503, 504];
