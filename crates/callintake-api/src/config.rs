//! Configuration management for the callintake service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::state::DEFAULT_SERVICE_NAME;

const CONFIG_FILE: &str = "callintake.toml";

/// Service configuration with defaults, file, and environment overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`callintake.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The defaults listen on every interface at port 5000 and keep
/// `data.json` and `notifications.txt` in the working directory.
///
/// # Example
///
/// ```no_run
/// use callintake_api::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
///
/// println!("Patients are stored in {}", config.data_file);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,
    /// Name reported by the health endpoint.
    ///
    /// Environment variable: `SERVICE_NAME`
    #[serde(default = "default_service_name", alias = "SERVICE_NAME")]
    pub service_name: String,

    // Files
    /// Path of the patient store document.
    ///
    /// Environment variable: `DATA_FILE`
    #[serde(default = "default_data_file", alias = "DATA_FILE")]
    pub data_file: String,
    /// Path of the notification log.
    ///
    /// Environment variable: `NOTIFICATIONS_FILE`
    #[serde(default = "default_notifications_file", alias = "NOTIFICATIONS_FILE")]
    pub notifications_file: String,

    // Logging
    /// Log filter directives.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed("")),
        )
    }

    /// Extracts and validates configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.data_file.trim().is_empty() {
            anyhow::bail!("data_file must not be empty");
        }

        if self.notifications_file.trim().is_empty() {
            anyhow::bail!("notifications_file must not be empty");
        }

        if self.data_file == self.notifications_file {
            anyhow::bail!("data_file and notifications_file must differ");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            service_name: default_service_name(),
            data_file: default_data_file(),
            notifications_file: default_notifications_file(),
            rust_log: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_data_file() -> String {
    "data.json".to_string()
}

fn default_notifications_file() -> String {
    "notifications.txt".to_string()
}

fn default_log_level() -> String {
    "info,callintake=debug,tower_http=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.parse_server_addr().unwrap(), "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.data_file, "data.json");
        assert_eq!(config.notifications_file, "notifications.txt");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn toml_overrides_defaults() {
        let figment = defaults().merge(Toml::string(
            r#"
            port = 8081
            data_file = "/var/lib/callintake/patients.json"
            "#,
        ));

        let config = Config::from_figment(figment).unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.data_file, "/var/lib/callintake/patients.json");
        assert_eq!(config.notifications_file, "notifications.txt");
    }

    #[test]
    fn zero_port_is_rejected() {
        let figment = defaults().merge(Toml::string("port = 0"));

        let error = Config::from_figment(figment).unwrap_err();

        assert!(error.to_string().contains("port"));
    }

    #[test]
    fn shared_file_paths_are_rejected() {
        let figment = defaults().merge(Toml::string(
            r#"
            data_file = "state.txt"
            notifications_file = "state.txt"
            "#,
        ));

        assert!(Config::from_figment(figment).is_err());
    }

    #[test]
    fn invalid_host_fails_address_parsing() {
        let config = Config { host: "not a host".to_string(), ..Config::default() };

        assert!(config.parse_server_addr().is_err());
    }
}
