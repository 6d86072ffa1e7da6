//! Configuration loaded from environment variables.
//!
//! Every setting has a default, so the server starts with an empty
//! environment. Parsing goes through [`AppConfig::from_lookup`] so tests can
//! feed a map instead of mutating the process environment.

use std::time::Duration;

use catalog_store::{DEFAULT_REFRESH_INTERVAL, DEFAULT_SOURCE_URL, FieldMapping};

use crate::server::ServerConfig;

/// Default outbound request timeout in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// Default label reported as `dataSource` by the status endpoint.
const DEFAULT_SOURCE_LABEL: &str = "Google Drive";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// The offending variable.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Log output format for the `tracing` subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address.
    pub server: ServerConfig,
    /// URL of the remote catalog document.
    pub source_url: String,
    /// Label shown as the data source in `/api/status`.
    pub source_label: String,
    /// Document layout.
    pub mapping: FieldMapping,
    /// Time between reloads.
    pub refresh_interval: Duration,
    /// Outbound request timeout.
    pub fetch_timeout: Duration,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            source_url: DEFAULT_SOURCE_URL.to_owned(),
            source_label: DEFAULT_SOURCE_LABEL.to_owned(),
            mapping: FieldMapping::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Optional variables:
    /// - `HOST` -- bind address (default `0.0.0.0`)
    /// - `PORT` -- listen port (default `3000`)
    /// - `CATALOG_SOURCE_URL` -- remote document URL
    /// - `CATALOG_SOURCE_LABEL` -- data source label (default `Google Drive`)
    /// - `CATALOG_SCHEMA` -- `english` or `spanish` (default `english`)
    /// - `CATALOG_REFRESH_SECS` -- reload interval (default 1800)
    /// - `CATALOG_FETCH_TIMEOUT_SECS` -- request timeout (default 60)
    /// - `LOG_FORMAT` -- `pretty` (or `text`) or `json` (default `pretty`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.server.host);

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => defaults.server.port,
        };

        let source_url = lookup("CATALOG_SOURCE_URL").unwrap_or(defaults.source_url);
        let source_label = lookup("CATALOG_SOURCE_LABEL").unwrap_or(defaults.source_label);

        let mapping = match lookup("CATALOG_SCHEMA") {
            Some(raw) => raw.parse::<FieldMapping>().map_err(|e| ConfigError::Invalid {
                name: "CATALOG_SCHEMA",
                reason: e.to_string(),
            })?,
            None => defaults.mapping,
        };

        let refresh_interval = seconds(&lookup, "CATALOG_REFRESH_SECS")?
            .unwrap_or(defaults.refresh_interval);
        let fetch_timeout = seconds(&lookup, "CATALOG_FETCH_TIMEOUT_SECS")?
            .unwrap_or(defaults.fetch_timeout);

        let log_format = match lookup("LOG_FORMAT").map(|raw| raw.trim().to_lowercase()) {
            None => defaults.log_format,
            Some(raw) => match raw.as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                other => {
                    return Err(ConfigError::Invalid {
                        name: "LOG_FORMAT",
                        reason: format!("unknown format `{other}`"),
                    });
                }
            },
        };

        Ok(Self {
            server: ServerConfig { host, port },
            source_url,
            source_label,
            mapping,
            refresh_interval,
            fetch_timeout,
            log_format,
        })
    }
}

/// Read a strictly positive number of seconds.
fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };

    let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("{e}"),
    })?;

    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: String::from("must be greater than zero"),
        });
    }

    Ok(Some(Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]);
        assert!(config.is_ok_and(|c| {
            c.server.port == 3000
                && c.server.host == "0.0.0.0"
                && c.source_url == DEFAULT_SOURCE_URL
                && c.mapping == FieldMapping::english()
                && c.refresh_interval == Duration::from_secs(1800)
                && c.fetch_timeout == Duration::from_secs(60)
                && c.log_format == LogFormat::Pretty
        }));
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("PORT", "8081"),
            ("CATALOG_SOURCE_URL", "http://localhost:9000/db.json"),
            ("CATALOG_SCHEMA", "spanish"),
            ("CATALOG_REFRESH_SECS", "90"),
            ("LOG_FORMAT", "JSON"),
        ]);
        assert!(config.is_ok_and(|c| {
            c.server.port == 8081
                && c.source_url == "http://localhost:9000/db.json"
                && c.mapping == FieldMapping::spanish()
                && c.refresh_interval == Duration::from_secs(90)
                && c.log_format == LogFormat::Json
        }));
    }

    #[test]
    fn host_and_text_log_format_are_read() {
        let config = load(&[("HOST", "127.0.0.1"), ("LOG_FORMAT", " text ")]);
        assert!(config.is_ok_and(|c| {
            c.server.host == "127.0.0.1"
                && c.server.socket_addr().is_ok()
                && c.log_format == LogFormat::Pretty
        }));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(load(&[("PORT", "http")]).is_err());
        assert!(load(&[("PORT", "70000")]).is_err());
        assert!(load(&[("CATALOG_SCHEMA", "french")]).is_err());
        assert!(load(&[("CATALOG_REFRESH_SECS", "0")]).is_err());
        assert!(load(&[("CATALOG_FETCH_TIMEOUT_SECS", "-5")]).is_err());
        assert!(load(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
