//! PostgreSQL storage backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{Lead, LeadContact, OpeningRule, OpeningRuleUpsert, SlotQuota};
use sqlx::PgPool;

use super::{LeadStore, QuotaLedger, ReserveOutcome, RuleStore, StoreError, StoreResult};
use crate::db;

/// SQLSTATEs that mean "rolled back, safe to retry"
const RETRYABLE_SQLSTATES: &[&str] = &[
    "55P03", // lock_not_available (lock_timeout)
    "40001", // serialization_failure
    "40P01", // deadlock_detected
];

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => StoreError::Busy(err.to_string()),
            sqlx::Error::Database(db_err)
                if db_err
                    .code()
                    .is_some_and(|code| RETRYABLE_SQLSTATES.iter().any(|s| code == *s)) =>
            {
                StoreError::Busy(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Corrupt(err.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    lock_timeout_ms: u64,
}

impl PgStore {
    pub fn new(pool: PgPool, lock_timeout_ms: u64) -> Self {
        Self {
            pool,
            lock_timeout_ms,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RuleStore for PgStore {
    async fn rule_for_weekday(&self, weekday: i16) -> StoreResult<Option<OpeningRule>> {
        Ok(db::rules::find_active_by_weekday(&self.pool, weekday).await?)
    }

    async fn list_rules(&self) -> StoreResult<Vec<OpeningRule>> {
        Ok(db::rules::list_rules(&self.pool).await?)
    }

    async fn upsert_rule(&self, upsert: &OpeningRuleUpsert) -> StoreResult<OpeningRule> {
        Ok(db::rules::upsert_rule(&self.pool, upsert).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(db::ping(&self.pool).await?)
    }
}

#[async_trait]
impl QuotaLedger for PgStore {
    async fn ensure(&self, start_at: DateTime<Utc>, capacity: i32) -> StoreResult<SlotQuota> {
        Ok(db::quotas::ensure_quota(&self.pool, start_at, capacity).await?)
    }

    async fn reserve(&self, start_at: DateTime<Utc>, capacity: i32) -> StoreResult<ReserveOutcome> {
        Ok(db::quotas::reserve(&self.pool, start_at, capacity, self.lock_timeout_ms).await?)
    }

    async fn release(&self, start_at: DateTime<Utc>) -> StoreResult<Option<SlotQuota>> {
        Ok(db::quotas::release(&self.pool, start_at, self.lock_timeout_ms).await?)
    }

    async fn find(&self, start_at: DateTime<Utc>) -> StoreResult<Option<SlotQuota>> {
        Ok(db::quotas::find_quota(&self.pool, start_at).await?)
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<SlotQuota>> {
        Ok(db::quotas::list_between(&self.pool, from, to).await?)
    }
}

#[async_trait]
impl LeadStore for PgStore {
    async fn create_lead(
        &self,
        contact: &LeadContact,
        appointment_at: DateTime<Utc>,
    ) -> StoreResult<Lead> {
        Ok(db::leads::create_lead(&self.pool, contact, appointment_at).await?)
    }

    async fn leads_for_slot(&self, appointment_at: DateTime<Utc>) -> StoreResult<Vec<Lead>> {
        Ok(db::leads::list_for_slot(&self.pool, appointment_at).await?)
    }
}
