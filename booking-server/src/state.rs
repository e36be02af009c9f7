//! Application state shared by every handler

use std::path::Path;

use chrono_tz::Tz;
use shared::models::OpeningRuleUpsert;

use crate::booking::BookingService;
use crate::config::{Config, StorageKind};
use crate::db;
use crate::store::{MemoryStore, PgStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone, Debug)]
pub struct AppState {
    pub service: BookingService,
    /// Reported by `/health`
    pub storage: StorageKind,
}

impl AppState {
    /// Open the configured backend and wire the booking service to it
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let service = match config.storage {
            StorageKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or("DATABASE_URL must be set when STORAGE=postgres")?;
                let pool = db::connect(url, config.db_max_connections).await?;
                BookingService::from_store(PgStore::new(pool, config.lock_timeout_ms), config.timezone)
            }
            StorageKind::Memory => {
                tracing::warn!("Using in-memory storage, bookings are lost on restart");
                BookingService::from_store(MemoryStore::new(), config.timezone)
            }
        };

        if let Some(path) = &config.opening_rules_file {
            seed_rules(&service, path).await?;
        }

        Ok(Self {
            service: service.with_compensation(config.compensate_failed_leads),
            storage: config.storage,
        })
    }

    /// State over an existing in-memory store
    pub fn in_memory(store: MemoryStore, tz: Tz) -> Self {
        Self::from_service(BookingService::from_store(store, tz), StorageKind::Memory)
    }

    pub fn from_service(service: BookingService, storage: StorageKind) -> Self {
        Self { service, storage }
    }
}

/// Apply the weekday rules listed in a JSON file. Every entry is validated
/// before the first write.
pub async fn seed_rules(service: &BookingService, path: &Path) -> Result<usize, BoxError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let rules: Vec<OpeningRuleUpsert> = serde_json::from_str(&raw)
        .map_err(|e| format!("invalid rules in {}: {e}", path.display()))?;

    for rule in &rules {
        rule.validate()?;
    }
    for rule in &rules {
        service.apply_rule(rule).await?;
    }

    tracing::info!(count = rules.len(), path = %path.display(), "Opening rules seeded");
    Ok(rules.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Paris;

    fn write_rules(name: &str, json: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, json).unwrap();
        path
    }

    #[tokio::test]
    async fn test_seed_rules_then_list_slots() {
        let path = write_rules(
            "rules",
            r#"[
                {"weekday": 1, "open_time": "10:00", "close_time": "12:00",
                 "slot_duration_minutes": 30, "capacity_per_slot": 2},
                {"weekday": 6, "slot_duration_minutes": 30, "capacity_per_slot": 1}
            ]"#,
        );
        let state = AppState::in_memory(MemoryStore::new(), Paris);

        assert_eq!(seed_rules(&state.service, &path).await.unwrap(), 2);
        let tuesday = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert_eq!(state.service.list_slots_with_quota(tuesday).await.unwrap().len(), 4);
        // Sunday has no hours
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(state.service.list_slots_with_quota(sunday).await.unwrap().is_empty());

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_invalid_rule_writes_nothing() {
        let path = write_rules(
            "bad-rules",
            r#"[
                {"weekday": 1, "open_time": "10:00", "close_time": "12:00",
                 "slot_duration_minutes": 30, "capacity_per_slot": 2},
                {"weekday": 9, "open_time": "10:00", "close_time": "12:00",
                 "slot_duration_minutes": 30, "capacity_per_slot": 2}
            ]"#,
        );
        let state = AppState::in_memory(MemoryStore::new(), Paris);

        assert!(seed_rules(&state.service, &path).await.is_err());
        assert!(state.service.list_rules().await.unwrap().is_empty());

        std::fs::remove_file(path).ok();
    }
}
