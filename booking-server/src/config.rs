//! Booking server configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | ENVIRONMENT | development | development / staging / production |
//! | HTTP_PORT | 8080 | HTTP listen port |
//! | STORAGE | postgres | `postgres` or `memory` |
//! | DATABASE_URL | - | PostgreSQL URL, required with `STORAGE=postgres` |
//! | DB_MAX_CONNECTIONS | 10 | pool size |
//! | LOCK_TIMEOUT_MS | 5000 | row lock wait for booking transactions |
//! | BUSINESS_TIMEZONE | Europe/Paris | IANA zone used to build slot instants |
//! | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
//! | COMPENSATE_FAILED_LEADS | false | release the slot when lead creation fails |
//! | OPENING_RULES_FILE | - | JSON array of weekday rules applied at startup |
//!
//! `LOG_DIR` is read by the logger before the configuration is loaded.

use chrono_tz::Tz;
use std::path::PathBuf;
use std::str::FromStr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    /// Process-local storage for development and tests
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown STORAGE '{other}' (expected postgres or memory)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    pub http_port: u16,
    pub storage: StorageKind,
    /// PostgreSQL connection URL
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub lock_timeout_ms: u64,
    pub timezone: Tz,
    pub request_timeout_ms: u64,
    /// Release the reserved place when the lead record cannot be written
    pub compensate_failed_leads: bool,
    /// Rules written to the rule store at startup
    pub opening_rules_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let storage: StorageKind = std::env::var("STORAGE")
            .unwrap_or_else(|_| "postgres".into())
            .parse()?;
        if storage == StorageKind::Memory && environment == "production" {
            return Err("STORAGE=memory is not allowed in production".into());
        }

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if storage == StorageKind::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set when STORAGE=postgres".into());
        }

        let tz_name = std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "Europe/Paris".into());
        let timezone: Tz = tz_name
            .parse()
            .map_err(|e| format!("invalid BUSINESS_TIMEZONE '{tz_name}': {e}"))?;

        Ok(Self {
            environment,
            http_port: env_number("HTTP_PORT", 8080),
            storage,
            database_url,
            db_max_connections: env_number("DB_MAX_CONNECTIONS", 10),
            lock_timeout_ms: env_number("LOCK_TIMEOUT_MS", 5000),
            timezone,
            request_timeout_ms: env_number("REQUEST_TIMEOUT_MS", 30000),
            compensate_failed_leads: env_flag("COMPENSATE_FAILED_LEADS", false),
            opening_rules_file: std::env::var("OPENING_RULES_FILE")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        })
    }

    /// In-memory configuration, used by tests and local demos
    pub fn in_memory(timezone: Tz) -> Self {
        Self {
            environment: "development".into(),
            http_port: 0,
            storage: StorageKind::Memory,
            database_url: None,
            db_max_connections: 1,
            lock_timeout_ms: 5000,
            timezone,
            request_timeout_ms: 30000,
            compensate_failed_leads: false,
            opening_rules_file: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Numeric tunables fall back to their default with a warning
fn env_number<T: FromStr + std::fmt::Display + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {name}='{raw}', falling back to {default}");
            default
        }),
        Err(_) => default,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kind_parse() {
        assert_eq!("postgres".parse::<StorageKind>(), Ok(StorageKind::Postgres));
        assert_eq!("PostgreSQL".parse::<StorageKind>(), Ok(StorageKind::Postgres));
        assert_eq!(" memory ".parse::<StorageKind>(), Ok(StorageKind::Memory));
        assert!("redis".parse::<StorageKind>().is_err());
    }

    #[test]
    fn test_in_memory_config() {
        let config = Config::in_memory(chrono_tz::Europe::Paris);
        assert_eq!(config.storage, StorageKind::Memory);
        assert!(!config.is_production());
        assert!(!config.compensate_failed_leads);
    }
}
