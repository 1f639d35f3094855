//! Platform detection and OS-specific paths.

use std::path::PathBuf;

use crate::error::{PnError, PnResult};

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the current platform at compile time.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// Get the platform-specific application data directory.
    ///
    /// - Windows: `%APPDATA%/postnl-rs`
    /// - macOS: `~/Library/Application Support/postnl-rs`
    /// - Linux: `~/.local/share/postnl-rs`
    pub fn data_dir() -> PnResult<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| PnError::Config("could not determine data directory".into()))?;
        Ok(base.join("postnl-rs"))
    }

    /// Get the platform-specific configuration directory.
    pub fn config_dir() -> PnResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| PnError::Config("could not determine config directory".into()))?;
        Ok(base.join("postnl-rs"))
    }

    /// Get the platform-specific cache directory.
    pub fn cache_dir() -> PnResult<PathBuf> {
        let base = dirs::cache_dir()
            .ok_or_else(|| PnError::Config("could not determine cache directory".into()))?;
        Ok(base.join("postnl-rs"))
    }

    /// Get a human-readable platform name.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detection() {
        let p = Platform::current();
        assert!(matches!(p, Platform::Windows | Platform::MacOs | Platform::Linux));
    }

    #[test]
    fn test_platform_name() {
        assert_eq!(Platform::Windows.name(), "Windows");
        assert_eq!(Platform::MacOs.name(), "macOS");
        assert_eq!(Platform::Linux.name(), "Linux");
    }
}
