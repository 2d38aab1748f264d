//! Configuration loading from environment.

use std::env;
use std::num::NonZeroU32;

#[cfg(feature = "postgres")]
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/conversions";
#[cfg(not(feature = "postgres"))]
const DEFAULT_DATABASE_URL: &str = "sqlite://conversions.db?mode=rwc";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: Option<u32>,
    /// `None` disables rate limiting
    pub rate_limit_per_minute: Option<NonZeroU32>,
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(v) => parse(&v, "PORT", "a port number")?,
            None => 5000,
        };

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS")
            .map(|v| parse(&v, "DATABASE_MAX_CONNECTIONS", "a positive integer"))
            .transpose()?;

        // 0 means "off", same as unset
        let rate_limit_per_minute = var("RATE_LIMIT_PER_MINUTE")
            .map(|v| parse::<u32>(&v, "RATE_LIMIT_PER_MINUTE", "a non-negative integer"))
            .transpose()?
            .and_then(NonZeroU32::new);

        let log_format = match var("LOG_FORMAT").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    expected: "`pretty` or `json`",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections,
            rate_limit_per_minute,
            log_format,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// `host:port` to bind the server to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(
    value: &str,
    name: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database_max_connections, None);
        assert_eq!(config.rate_limit_per_minute, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.otlp_endpoint, None);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("RATE_LIMIT_PER_MINUTE", "120"),
            ("LOG_FORMAT", "JSON"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.database_max_connections, Some(4));
        assert_eq!(config.rate_limit_per_minute, NonZeroU32::new(120));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://localhost:4317")
        );
    }

    #[test]
    fn test_zero_rate_limit_disables_limiting() {
        let config = config(&[("RATE_LIMIT_PER_MINUTE", "0")]).unwrap();
        assert_eq!(config.rate_limit_per_minute, None);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config(&[("PORT", ""), ("OTEL_EXPORTER_OTLP_ENDPOINT", " ")]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.otlp_endpoint, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[("PORT", "http")]).is_err());
        assert!(config(&[("RATE_LIMIT_PER_MINUTE", "-1")]).is_err());

        let err = config(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "LOG_FORMAT must be `pretty` or `json`, got \"xml\""
        );
    }
}
