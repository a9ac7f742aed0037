use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::utils::get_env_with_prefix;

/// Main configuration for the sync service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub webhook: WebhookConfig,
    pub clerk: ClerkConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum request body size in bytes (default: 1MB)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Settings for verifying inbound webhook deliveries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    /// Svix signing secret from the Clerk dashboard (`whsec_...`). Required.
    #[serde(default)]
    pub secret: String,
    /// Maximum accepted clock skew for the `svix-timestamp` header, in seconds.
    #[serde(default = "default_tolerance_seconds")]
    pub tolerance_seconds: u64,
}

/// Settings for the outbound Clerk Backend API client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClerkConfig {
    /// Bearer token for the Clerk Backend API (`sk_...`).
    ///
    /// Optional: when absent the metadata callback after user creation is
    /// skipped, which is useful when running against a local store only.
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            webhook: WebhookConfig::default(),
            clerk: ClerkConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            tolerance_seconds: default_tolerance_seconds(),
        }
    }
}

impl Default for ClerkConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            api_url: default_api_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_max_body_size() -> usize {
    1024 * 1024 // webhook payloads are small; 1MB is generous
}

fn default_tolerance_seconds() -> u64 {
    300
}

fn default_api_url() -> String {
    "https://api.clerk.com/v1".to_string()
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.config.server.max_body_size = max_body_size;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Set the Svix signing secret used to verify inbound deliveries
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.webhook.secret = secret.into();
        self
    }

    pub fn with_webhook_tolerance(mut self, seconds: u64) -> Self {
        self.config.webhook.tolerance_seconds = seconds;
        self
    }

    pub fn with_clerk_secret_key(mut self, key: impl Into<String>) -> Self {
        self.config.clerk.secret_key = Some(key.into());
        self
    }

    pub fn with_clerk_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.clerk.api_url = url.into();
        self
    }

    /// Load configuration from environment variables with CLERK_SYNC_ prefix
    ///
    /// Unprefixed fallbacks are honored too, so the conventional
    /// `WEBHOOK_SECRET` and `CLERK_SECRET_KEY` names work as-is.
    pub fn from_env(mut self) -> Self {
        if let Some(host) = get_env_with_prefix("HOST") {
            self.config.server.host = host;
        }
        if let Some(port) = get_env_with_prefix("PORT") {
            if let Ok(p) = port.parse() {
                self.config.server.port = p;
            }
        }
        if let Some(max_body_size) = get_env_with_prefix("MAX_BODY_SIZE") {
            if let Ok(size) = max_body_size.parse() {
                self.config.server.max_body_size = size;
            }
        }
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        if let Some(secret) = get_env_with_prefix("WEBHOOK_SECRET") {
            self.config.webhook.secret = secret;
        }
        if let Some(tolerance) = get_env_with_prefix("WEBHOOK_TOLERANCE_SECONDS") {
            if let Ok(t) = tolerance.parse() {
                self.config.webhook.tolerance_seconds = t;
            }
        }
        if let Some(key) = get_env_with_prefix("CLERK_SECRET_KEY") {
            self.config.clerk.secret_key = Some(key);
        }
        if let Some(url) = get_env_with_prefix("CLERK_API_URL") {
            self.config.clerk.api_url = url;
        }

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration is invalid:
    /// - Missing webhook signing secret
    /// - Invalid server address (host:port)
    /// - Invalid log level
    /// - Zero timestamp tolerance or body size
    pub fn build(self) -> crate::error::Result<Config> {
        if self.config.webhook.secret.is_empty() {
            return Err(crate::error::SyncError::config(
                "webhook signing secret is required; set WEBHOOK_SECRET from the Clerk dashboard",
            ));
        }

        self.config.server.addr().map_err(|e| {
            crate::error::SyncError::config(format!(
                "invalid server address {}:{} - {}",
                self.config.server.host, self.config.server.port, e
            ))
        })?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(crate::error::SyncError::config(format!(
                "invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        if self.config.server.port == 0 {
            return Err(crate::error::SyncError::config(
                "server port must be greater than 0",
            ));
        }

        if self.config.server.max_body_size == 0 {
            return Err(crate::error::SyncError::config(
                "maximum body size must be greater than 0",
            ));
        }

        if self.config.webhook.tolerance_seconds == 0 {
            return Err(crate::error::SyncError::config(
                "webhook timestamp tolerance must be greater than 0",
            ));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_secret() {
        let result = ConfigBuilder::new().build();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("signing secret"));
    }

    #[test]
    fn test_build_with_secret_succeeds() {
        let config = ConfigBuilder::new()
            .with_webhook_secret("whsec_dGVzdA==")
            .build()
            .unwrap();
        assert_eq!(config.webhook.secret, "whsec_dGVzdA==");
        assert_eq!(config.webhook.tolerance_seconds, 300);
        assert_eq!(config.server.port, 8000);
        assert!(config.clerk.secret_key.is_none());
        assert_eq!(config.clerk.api_url, "https://api.clerk.com/v1");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_webhook_secret("whsec_dGVzdA==")
            .with_host("127.0.0.1")
            .with_port(3000)
            .with_webhook_tolerance(60)
            .with_clerk_secret_key("sk_test_abc")
            .with_clerk_api_url("http://localhost:9000/v1")
            .build()
            .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.webhook.tolerance_seconds, 60);
        assert_eq!(config.clerk.secret_key.as_deref(), Some("sk_test_abc"));
        assert_eq!(config.clerk.api_url, "http://localhost:9000/v1");
    }

    #[test]
    fn test_build_rejects_invalid_log_level() {
        let result = ConfigBuilder::new()
            .with_webhook_secret("whsec_dGVzdA==")
            .with_log_level("verbose")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_rejects_zero_port() {
        let result = ConfigBuilder::new()
            .with_webhook_secret("whsec_dGVzdA==")
            .with_port(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_rejects_zero_tolerance() {
        let result = ConfigBuilder::new()
            .with_webhook_secret("whsec_dGVzdA==")
            .with_webhook_tolerance(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_rejects_zero_body_size() {
        let result = ConfigBuilder::new()
            .with_webhook_secret("whsec_dGVzdA==")
            .with_max_body_size(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_server_addr() {
        let config = ConfigBuilder::new()
            .with_webhook_secret("whsec_dGVzdA==")
            .with_host("127.0.0.1")
            .with_port(8080)
            .build()
            .unwrap();
        assert_eq!(config.server.addr().unwrap().to_string(), "127.0.0.1:8080");
    }
}
