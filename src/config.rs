//! Configuration loading for the gateway.
//!
//! Merges defaults, an optional `config.toml`, and `BRIDGELET_`-prefixed
//! environment variables (nested keys split on `__`, e.g.
//! `BRIDGELET_BACKEND__BASE_URL`).

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::client::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

/// Where the legacy backends live and how long each call may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, compact, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("BRIDGELET_").split("__"));

        figment.extract().context("Failed to load configuration")
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("BRIDGELET_").split("__"));

        figment
            .extract()
            .context("Failed to load configuration from file")
    }
}

/// Initialize tracing based on logging configuration
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.level.trim().is_empty() {
            EnvFilter::new("info")
        } else {
            EnvFilter::new(config.level.clone())
        }
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            let stdout_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_timer(tracing_subscriber::fmt::time::uptime())
                .with_level(true);
            registry.with(stdout_layer).init();
        }
        "compact" => {
            let stdout_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_timer(tracing_subscriber::fmt::time::uptime())
                .with_level(true);
            registry.with(stdout_layer).init();
        }
        _ => {
            let stdout_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(true)
                .with_timer(tracing_subscriber::fmt::time::uptime())
                .with_level(true);
            registry.with(stdout_layer).init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.timeout_secs, 5);
        assert_eq!(config.backend.timeout(), Duration::from_secs(5));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [backend]
                    base_url = "http://legacy.internal:9000"
                    timeout_secs = 2
                "#,
            )?;
            let config = GatewayConfig::load().expect("load");
            assert_eq!(config.backend.base_url, "http://legacy.internal:9000");
            assert_eq!(config.backend.timeout_secs, 2);
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [backend]
                    base_url = "http://from-toml:9000"
                "#,
            )?;
            jail.set_env("BRIDGELET_BACKEND__BASE_URL", "http://from-env:9001");
            let config = GatewayConfig::load().expect("load");
            assert_eq!(config.backend.base_url, "http://from-env:9001");
            Ok(())
        });
    }
}
