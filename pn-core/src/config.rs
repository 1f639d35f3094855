//! SDK configuration management.
//!
//! Handles loading, saving, and accessing SDK configuration including the
//! API base URL, credentials, HTTP behavior, and logging preferences.
//! Configuration is persisted as TOML on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{PnError, PnResult};
use crate::platform::Platform;

/// Top-level SDK configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// HTTP behavior settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API base URL. If empty, the production or sandbox endpoint is used
    /// depending on the `sandbox` flag.
    #[serde(default)]
    pub base_url: String,

    /// API key sent with every request.
    #[serde(default)]
    pub api_key: String,

    /// Customer code assigned by the carrier.
    #[serde(default)]
    pub customer_code: String,

    /// Customer number assigned by the carrier.
    #[serde(default)]
    pub customer_number: String,

    /// Target the sandbox environment instead of production.
    #[serde(default)]
    pub sandbox: bool,

    /// API request timeout in milliseconds.
    #[serde(default = "default_api_timeout")]
    pub api_timeout_ms: u64,

    /// Custom HTTP headers as key-value pairs.
    #[serde(default)]
    pub custom_headers: std::collections::HashMap<String, String>,

    /// Whether to accept self-signed TLS certificates (test setups only).
    #[serde(default)]
    pub accept_self_signed_certs: bool,
}

/// HTTP behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Number of retry attempts for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Ceiling on concurrent in-flight requests.
    #[serde(default = "default_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Log every request and response through the tracing subscriber.
    #[serde(default)]
    pub log_requests: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Maximum log file size in bytes before rotation.
    #[serde(default = "default_max_log_size")]
    pub max_file_size_bytes: u64,

    /// Maximum number of rotated log files to keep.
    #[serde(default = "default_max_log_files")]
    pub max_rotated_files: u32,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_api_timeout() -> u64 {
    constants::DEFAULT_API_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    constants::DEFAULT_MAX_RETRIES
}

fn default_concurrent_requests() -> usize {
    constants::DEFAULT_CONCURRENT_REQUESTS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_size() -> u64 {
    1_048_576 // 1 MB
}

fn default_max_log_files() -> u32 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            customer_code: String::new(),
            customer_number: String::new(),
            sandbox: false,
            api_timeout_ms: default_api_timeout(),
            custom_headers: std::collections::HashMap::new(),
            accept_self_signed_certs: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            max_concurrent_requests: default_concurrent_requests(),
            log_requests: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            max_file_size_bytes: default_max_log_size(),
            max_rotated_files: default_max_log_files(),
            json_output: false,
        }
    }
}

impl ApiConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> PnResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> PnResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ApiConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file path.
    pub fn save_default(&self) -> PnResult<()> {
        let path = Self::default_config_path()?;
        self.save_to_file(&path)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> PnResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| PnError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PnResult<PathBuf> {
        let config_dir = Platform::config_dir()?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> PnResult<PathBuf> {
        if self.logging.directory.is_empty() {
            let data_dir = Platform::data_dir()?;
            Ok(data_dir.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Check whether the API credentials are configured.
    pub fn is_configured(&self) -> bool {
        !self.server.api_key.is_empty()
    }

    /// Resolve the API base URL for this configuration.
    ///
    /// An explicitly configured `base_url` wins; otherwise the production
    /// or sandbox endpoint is selected by the `sandbox` flag.
    pub fn effective_base_url(&self) -> String {
        if self.server.base_url.is_empty() {
            if self.server.sandbox {
                constants::SANDBOX_API_URL.to_string()
            } else {
                constants::PRODUCTION_API_URL.to_string()
            }
        } else {
            Self::sanitize_base_url(&self.server.base_url)
        }
    }

    /// Sanitize and normalize an API base URL.
    ///
    /// Ensures the address has a scheme and strips trailing slashes.
    pub fn sanitize_base_url(address: &str) -> String {
        let trimmed = address.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        with_scheme.trim_end_matches('/').to_string()
    }
}
