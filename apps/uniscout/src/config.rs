//! # Configuration Module
//!
//! TOML-file configuration with environment overrides.
//!
//! Every section has workable defaults; a missing config file is fine
//! unless the user asked for one explicitly. Environment variables
//! (`UNISCOUT_UPSTREAM_URL`, `UNISCOUT_ADMIN_PASSWORD`) win over the file,
//! matching the env-first conventions of the CORS/rate-limit/API-key knobs
//! in the API layer.

use serde::Deserialize;
use std::path::Path;
use uniscout_core::DirectoryError;

// =============================================================================
// CONFIG SECTIONS
// =============================================================================

/// HTTP server binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Upstream directory REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the directory API (no trailing slash).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://unicorner-back.vercel.app".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Transactional email dispatch for lead submissions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeadsConfig {
    /// Email delivery endpoint base URL.
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com".to_string(),
            service_id: String::new(),
            template_id: String::new(),
            user_id: String::new(),
        }
    }
}

/// Admin gate. Not a security boundary: a single shared password guarding
/// a demo console.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Empty password keeps the gate permanently locked.
    pub password: String,
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub leads: LeadsConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load configuration: defaults, then the TOML file (if any), then
    /// environment overrides.
    ///
    /// A `path` that does not exist is an error — the user asked for that
    /// file. `None` means "defaults plus environment".
    pub fn load(path: Option<&Path>) -> Result<Self, DirectoryError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    DirectoryError::Io(format!("Cannot read config '{}': {}", path.display(), e))
                })?;
                toml::from_str(&text).map_err(|e| {
                    DirectoryError::Serialization(format!(
                        "Invalid config '{}': {}",
                        path.display(),
                        e
                    ))
                })?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("UNISCOUT_UPSTREAM_URL")
            && !url.is_empty()
        {
            self.upstream.base_url = url;
        }
        if let Ok(password) = std::env::var("UNISCOUT_ADMIN_PASSWORD")
            && !password.is_empty()
        {
            self.admin.password = password;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_workable() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(!config.upstream.base_url.is_empty());
        assert!(config.admin.password.is_empty());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "[upstream]\nbase_url = \"http://localhost:9000\"\n\n[admin]\npassword = \"hunter2\""
        )
        .expect("write");

        let config = AppConfig::load(Some(file.path())).expect("load");
        assert_eq!(config.upstream.base_url, "http://localhost:9000");
        assert_eq!(config.admin.password, "hunter2");
        // Untouched sections keep their defaults
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.upstream.timeout_secs, 10);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/uniscout.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "not [valid toml").expect("write");
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
