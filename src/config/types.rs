//! Configuration types for promote-gate
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::util::SecretString;
use serde::Deserialize;
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Webhook server settings
    pub server: ServerConfig,

    /// Authorization rules
    pub authz: AuthzConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Webhook server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind the webhook listener to
    pub host: String,

    /// Port to bind the webhook listener to
    pub port: u16,

    /// Shared secret for Drone http-signature verification
    /// (prefer env var DRONE_SECRET)
    #[serde(default)]
    pub secret: Option<SecretString>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            secret: None,
        }
    }
}

/// Authorization configuration
///
/// Grants may be supplied in exactly one of two encodings:
///
/// - `grants`: tabular records, one `user,environment,repo` per line
/// - `user_grants`: per-user strings, `env1[repo1,repo2]|env2[repo3]`
///
/// Both compile to the same in-memory index.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthzConfig {
    /// Users allowed to promote/rollback anywhere
    pub privileged_users: Vec<String>,

    /// Tabular grant records
    #[serde(default)]
    pub grants: Option<String>,

    /// Per-user delimited grant strings
    #[serde(default)]
    pub user_grants: HashMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.secret.is_none());
        assert!(config.authz.privileged_users.is_empty());
        assert!(config.authz.grants.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);

        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}
