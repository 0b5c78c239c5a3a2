use std::collections::HashMap;
use std::env;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub jwt_secret: String,
    /// Organization served by this instance; injected into every
    /// handler rather than read from ambient state in business logic.
    pub org_id: String,
    pub sync_transactional: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_path", &self.database_path)
            .field("jwt_secret", &"[REDACTED]")
            .field("org_id", &self.org_id)
            .field("sync_transactional", &self.sync_transactional)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "RESERVA_BIND_ADDR", "127.0.0.1:8080");
        let database_path = value_or_default(&lookup, "RESERVA_DB_PATH", "reserva.db");
        let jwt_secret = required_trimmed(&lookup, "RESERVA_JWT_SECRET")?;
        let org_id = value_or_default(&lookup, "RESERVA_ORG_ID", "default");

        let sync_transactional =
            match value_or_default(&lookup, "RESERVA_SYNC_TRANSACTIONAL", "true").as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(ConfigError::Invalid(format!(
                        "RESERVA_SYNC_TRANSACTIONAL must be a boolean, got {other:?}"
                    )))
                }
            };

        Ok(Self {
            bind_addr,
            database_path,
            jwt_secret,
            org_id,
            sync_transactional,
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn required_trimmed(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional_trimmed(lookup, name).ok_or(ConfigError::MissingVar(name))
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
