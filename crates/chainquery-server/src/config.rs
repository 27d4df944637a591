//! Server configuration from environment variables.
//!
//! | variable           | default   |
//! |--------------------|-----------|
//! | `HOST`             | `0.0.0.0` |
//! | `PORT`             | `3000`    |
//! | `EVM_RPC`          | required  |
//! | `COSMOS_RPC`       | required  |
//! | `RPC_TIMEOUT_SECS` | `30`      |
//! | `LOG_LEVEL`        | `info`    |
//! | `LOG_JSON`         | unset     |
//! | `LOG_COMPONENTS`   | unset     |
//!
//! `LOG_COMPONENTS` lists per-crate levels layered over `LOG_LEVEL`, e.g.
//! `chainquery-cosmos=debug,chainquery_http=trace`.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::telemetry::LogConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub evm_rpc: String,
    pub cosmos_rpc: String,
    /// Per-request timeout for both node transports.
    pub rpc_timeout: Duration,
    pub log: LogConfig,
}

impl ServerConfig {
    /// Read the process environment. Does not load `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through `var`, which returns a variable's value if set.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| var(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("PORT") {
            Some(raw) => parse::<u16>("PORT", raw)?,
            None => 3000,
        };
        let timeout_secs = match get("RPC_TIMEOUT_SECS") {
            Some(raw) => parse::<u64>("RPC_TIMEOUT_SECS", raw)?,
            None => 30,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "RPC_TIMEOUT_SECS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            evm_rpc: required("EVM_RPC")?,
            cosmos_rpc: required("COSMOS_RPC")?,
            rpc_timeout: Duration::from_secs(timeout_secs),
            log: LogConfig {
                level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
                components: match get("LOG_COMPONENTS") {
                    Some(raw) => parse_components(raw)?,
                    None => HashMap::new(),
                },
                json: get("LOG_JSON").is_some(),
            },
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(name: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.parse::<T>() {
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value: raw,
        }),
    }
}

/// Parse `crate=level` pairs separated by commas. Empty entries are skipped.
fn parse_components(raw: String) -> Result<HashMap<String, String>, ConfigError> {
    let mut components = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.split_once('=') {
            Some((component, level)) if !component.trim().is_empty() && !level.trim().is_empty() => {
                components.insert(component.trim().to_string(), level.trim().to_string());
            }
            _ => {
                return Err(ConfigError::Invalid {
                    name: "LOG_COMPONENTS",
                    reason: format!("expected component=level, got {entry:?}"),
                    value: raw.clone(),
                })
            }
        }
    }
    Ok(components)
}
