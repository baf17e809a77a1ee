//! Configuration module for Memwall.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, WallError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (sqlite backend).
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Connection URL (postgres backend).
    #[serde(default)]
    pub url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/memwall.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in days (absolute expiry, no idle refresh).
    #[serde(default = "default_session_expiry_days")]
    pub expiry_days: i64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_session_expiry_days() -> i64 {
    30
}

fn default_cookie_name() -> String {
    "memwall_session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiry_days: default_session_expiry_days(),
            cookie_name: default_cookie_name(),
        }
    }
}

/// Invite code configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InviteConfig {
    /// Number of codes granted to each newly registered user.
    #[serde(default = "default_codes_per_user")]
    pub codes_per_user: u32,
    /// Maximum number of codes an admin may generate in one batch.
    #[serde(default = "default_admin_batch_max")]
    pub admin_batch_max: u32,
}

fn default_codes_per_user() -> u32 {
    3
}

fn default_admin_batch_max() -> u32 {
    10
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            codes_per_user: default_codes_per_user(),
            admin_batch_max: default_admin_batch_max(),
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Storage backend: "local" or "oss".
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Directory for locally stored uploads.
    #[serde(default = "default_uploads_dir")]
    pub dir: String,
    /// Public URL prefix mapped to the uploads directory.
    #[serde(default = "default_public_base")]
    pub public_base: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_backend() -> String {
    "local".to_string()
}

fn default_uploads_dir() -> String {
    "data/uploads".to_string()
}

fn default_public_base() -> String {
    "/uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            dir: default_uploads_dir(),
            public_base: default_public_base(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Site information configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Name of the site.
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Cohort label prefixed to class full names (e.g. "2025届").
    #[serde(default = "default_cohort")]
    pub cohort: String,
}

fn default_site_name() -> String {
    "Memwall".to_string()
}

fn default_cohort() -> String {
    "2025届".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            cohort: default_cohort(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path. Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Invite code configuration.
    #[serde(default)]
    pub invites: InviteConfig,
    /// Upload storage configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Site information.
    #[serde(default)]
    pub site: SiteConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(WallError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| WallError::Config(format!("config parse error: {e}")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.session.expiry_days <= 0 {
            return Err(WallError::Config(
                "session.expiry_days must be positive".to_string(),
            ));
        }
        if self.uploads.backend != "local" && self.uploads.backend != "oss" {
            return Err(WallError::Config(format!(
                "unknown uploads backend: {}",
                self.uploads.backend
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.session.expiry_days, 30);
        assert_eq!(config.invites.codes_per_user, 3);
        assert_eq!(config.invites.admin_batch_max, 10);
        assert_eq!(config.uploads.backend, "local");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
            [server]
            port = 8080

            [session]
            expiry_days = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.expiry_days, 7);
        // Unspecified sections fall back to defaults
        assert_eq!(config.database.path, "data/memwall.db");
        assert_eq!(config.session.cookie_name, "memwall_session");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.site.cohort, "2025届");
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(Config::parse("this is not toml [").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_expiry() {
        let mut config = Config::default();
        config.session.expiry_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_backend() {
        let mut config = Config::default();
        config.uploads.backend = "ftp".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_origins_parsed() {
        let config = Config::parse(
            r#"
            [server]
            cors_origins = ["https://example.com"]
            "#,
        )
        .unwrap();
        assert_eq!(config.server.cors_origins.len(), 1);
    }
}
