//! Storage seams for the booking core
//!
//! - [`RuleStore`]: weekly opening rules (read-mostly, admin-written)
//! - [`QuotaLedger`]: per-slot capacity counters, the only shared mutable state
//! - [`LeadStore`]: downstream business record created after a booking
//!
//! Two backends implement all three: [`PgStore`] (PostgreSQL, row locks via
//! `SELECT ... FOR UPDATE`) and [`MemoryStore`] (one async mutex per slot row).

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{Lead, LeadContact, OpeningRule, OpeningRuleUpsert, SlotQuota};
use thiserror::Error;

/// Storage faults. Business rejections never travel through this type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lock wait timed out, serialization failure or deadlock; the
    /// transaction was rolled back and the whole operation can be retried.
    #[error("Storage busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Persisted data violates a model invariant
    #[error("Corrupt data: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a locked check-then-increment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// `booked` was incremented; the row as committed
    Reserved(SlotQuota),
    /// `booked >= capacity` under the lock; the row is unchanged apart from
    /// capacity re-alignment
    Full(SlotQuota),
}

#[async_trait]
pub trait RuleStore: Send + Sync {
    /// The active rule for `weekday` (0 = Monday), if any
    async fn rule_for_weekday(&self, weekday: i16) -> StoreResult<Option<OpeningRule>>;

    /// All rules, active or not, ordered by weekday
    async fn list_rules(&self) -> StoreResult<Vec<OpeningRule>>;

    /// Create or replace the rule of `upsert.weekday` (one rule per weekday)
    async fn upsert_rule(&self, upsert: &OpeningRuleUpsert) -> StoreResult<OpeningRule>;

    /// Storage liveness probe for `/health`
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// Get-or-create the row with `capacity`, re-aligning an existing row's
    /// capacity. Unlocked: the result is advisory.
    async fn ensure(&self, start_at: DateTime<Utc>, capacity: i32) -> StoreResult<SlotQuota>;

    /// In one transaction: lock-then-get-or-create the row, re-align its
    /// capacity, then increment `booked` unless the slot is full.
    async fn reserve(&self, start_at: DateTime<Utc>, capacity: i32) -> StoreResult<ReserveOutcome>;

    /// Locked decrement floored at zero. `None` when no row exists; no row
    /// is created.
    async fn release(&self, start_at: DateTime<Utc>) -> StoreResult<Option<SlotQuota>>;

    async fn find(&self, start_at: DateTime<Utc>) -> StoreResult<Option<SlotQuota>>;

    /// Rows with `from <= start_at < to`, ordered by `start_at`
    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<SlotQuota>>;
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create_lead(
        &self,
        contact: &LeadContact,
        appointment_at: DateTime<Utc>,
    ) -> StoreResult<Lead>;

    async fn leads_for_slot(&self, appointment_at: DateTime<Utc>) -> StoreResult<Vec<Lead>>;
}
