//! In-process storage backend
//!
//! Each quota row lives behind its own `tokio::sync::Mutex`, so bookings on
//! one slot serialize while other slots proceed untouched. This is the
//! storage itself (data does not survive a restart), used for development
//! and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use shared::models::{Lead, LeadContact, OpeningRule, OpeningRuleUpsert, SlotQuota};
use shared::util::snowflake_id;
use tokio::sync::Mutex;

use super::{LeadStore, QuotaLedger, ReserveOutcome, RuleStore, StoreResult};

type QuotaRow = Arc<Mutex<SlotQuota>>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    rules: Arc<DashMap<i16, OpeningRule>>,
    quotas: Arc<DashMap<DateTime<Utc>, QuotaRow>>,
    leads: Arc<parking_lot::Mutex<Vec<Lead>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materialized quota rows
    pub fn quota_rows(&self) -> usize {
        self.quotas.len()
    }

    /// Existing row, without creating one
    fn row(&self, start_at: DateTime<Utc>) -> Option<QuotaRow> {
        self.quotas.get(&start_at).map(|entry| Arc::clone(entry.value()))
    }

    /// Existing or freshly inserted row. The map shard is released before
    /// the caller awaits the row lock.
    fn row_or_insert(&self, start_at: DateTime<Utc>, capacity: i32) -> QuotaRow {
        let entry = self
            .quotas
            .entry(start_at)
            .or_insert_with(|| Arc::new(Mutex::new(SlotQuota::new(start_at, capacity))));
        Arc::clone(entry.value())
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn rule_for_weekday(&self, weekday: i16) -> StoreResult<Option<OpeningRule>> {
        Ok(self
            .rules
            .get(&weekday)
            .map(|entry| entry.value().clone())
            .filter(|rule| rule.is_active))
    }

    async fn list_rules(&self) -> StoreResult<Vec<OpeningRule>> {
        let mut rules: Vec<OpeningRule> = self.rules.iter().map(|e| e.value().clone()).collect();
        rules.sort_by_key(|rule| rule.weekday);
        Ok(rules)
    }

    async fn upsert_rule(&self, upsert: &OpeningRuleUpsert) -> StoreResult<OpeningRule> {
        let mut entry = self.rules.entry(upsert.weekday).or_insert_with(|| OpeningRule {
            id: snowflake_id(),
            weekday: upsert.weekday,
            open_time: None,
            close_time: None,
            slot_duration_minutes: upsert.slot_duration_minutes,
            capacity_per_slot: upsert.capacity_per_slot,
            is_active: false,
        });
        let rule = entry.value_mut();
        rule.open_time = upsert.open_time;
        rule.close_time = upsert.close_time;
        rule.slot_duration_minutes = upsert.slot_duration_minutes;
        rule.capacity_per_slot = upsert.capacity_per_slot;
        rule.is_active = upsert.is_active;
        Ok(rule.clone())
    }
}

#[async_trait]
impl QuotaLedger for MemoryStore {
    async fn ensure(&self, start_at: DateTime<Utc>, capacity: i32) -> StoreResult<SlotQuota> {
        let row = self.row_or_insert(start_at, capacity);
        let mut quota = row.lock().await;
        if quota.capacity != capacity {
            quota.capacity = capacity;
        }
        Ok(quota.clone())
    }

    async fn reserve(&self, start_at: DateTime<Utc>, capacity: i32) -> StoreResult<ReserveOutcome> {
        let row = self.row_or_insert(start_at, capacity);
        let mut quota = row.lock().await;
        if quota.capacity != capacity {
            quota.capacity = capacity;
        }
        if quota.booked >= quota.capacity {
            return Ok(ReserveOutcome::Full(quota.clone()));
        }
        quota.booked += 1;
        Ok(ReserveOutcome::Reserved(quota.clone()))
    }

    async fn release(&self, start_at: DateTime<Utc>) -> StoreResult<Option<SlotQuota>> {
        let Some(row) = self.row(start_at) else {
            return Ok(None);
        };
        let mut quota = row.lock().await;
        if quota.booked > 0 {
            quota.booked -= 1;
        }
        Ok(Some(quota.clone()))
    }

    async fn find(&self, start_at: DateTime<Utc>) -> StoreResult<Option<SlotQuota>> {
        match self.row(start_at) {
            Some(row) => Ok(Some(row.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<SlotQuota>> {
        let rows: Vec<QuotaRow> = self
            .quotas
            .iter()
            .filter(|entry| *entry.key() >= from && *entry.key() < to)
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut quotas = Vec::with_capacity(rows.len());
        for row in rows {
            quotas.push(row.lock().await.clone());
        }
        quotas.sort_by_key(|quota| quota.start_at);
        Ok(quotas)
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn create_lead(
        &self,
        contact: &LeadContact,
        appointment_at: DateTime<Utc>,
    ) -> StoreResult<Lead> {
        let lead = Lead {
            id: snowflake_id(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            appointment_at,
            created_at: Utc::now(),
        };
        self.leads.lock().push(lead.clone());
        Ok(lead)
    }

    async fn leads_for_slot(&self, appointment_at: DateTime<Utc>) -> StoreResult<Vec<Lead>> {
        Ok(self
            .leads
            .lock()
            .iter()
            .filter(|lead| lead.appointment_at == appointment_at)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_reserve_creates_row_and_stops_at_capacity() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.reserve(slot(), 2).await.unwrap(),
            ReserveOutcome::Reserved(SlotQuota { booked: 1, .. })
        ));
        assert!(matches!(
            store.reserve(slot(), 2).await.unwrap(),
            ReserveOutcome::Reserved(SlotQuota { booked: 2, .. })
        ));
        assert_eq!(
            store.reserve(slot(), 2).await.unwrap(),
            ReserveOutcome::Full(SlotQuota {
                start_at: slot(),
                capacity: 2,
                booked: 2
            })
        );
        assert_eq!(store.quota_rows(), 1);
    }

    #[tokio::test]
    async fn test_reserve_realigns_capacity_before_check() {
        let store = MemoryStore::new();
        store.reserve(slot(), 1).await.unwrap();
        assert!(matches!(
            store.reserve(slot(), 1).await.unwrap(),
            ReserveOutcome::Full(_)
        ));

        // rule raised to 3: the next reservation sees the new capacity
        let outcome = store.reserve(slot(), 3).await.unwrap();
        assert_eq!(
            outcome,
            ReserveOutcome::Reserved(SlotQuota {
                start_at: slot(),
                capacity: 3,
                booked: 2
            })
        );
    }

    #[tokio::test]
    async fn test_release_floors_at_zero_and_never_creates() {
        let store = MemoryStore::new();
        assert_eq!(store.release(slot()).await.unwrap(), None);
        assert_eq!(store.quota_rows(), 0);

        store.ensure(slot(), 2).await.unwrap();
        let quota = store.release(slot()).await.unwrap().unwrap();
        assert_eq!(quota.booked, 0);
    }

    #[tokio::test]
    async fn test_list_between_is_half_open() {
        let store = MemoryStore::new();
        let a = slot();
        let b = a + chrono::Duration::minutes(30);
        let c = b + chrono::Duration::minutes(30);
        for start in [c, a, b] {
            store.ensure(start, 2).await.unwrap();
        }

        let rows = store.list_between(a, c).await.unwrap();
        let starts: Vec<_> = rows.iter().map(|q| q.start_at).collect();
        assert_eq!(starts, vec![a, b]);
    }

    #[tokio::test]
    async fn test_upsert_rule_replaces_in_place() {
        let store = MemoryStore::new();
        let t = |h| chrono::NaiveTime::from_hms_opt(h, 0, 0).unwrap();

        let first = store
            .upsert_rule(&OpeningRuleUpsert::open(1, t(10), t(12), 30, 2))
            .await
            .unwrap();
        let second = store
            .upsert_rule(&OpeningRuleUpsert::open(1, t(9), t(12), 30, 5))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.list_rules().await.unwrap().len(), 1);
        assert_eq!(
            store.rule_for_weekday(1).await.unwrap().unwrap().capacity_per_slot,
            5
        );

        let mut closed = OpeningRuleUpsert::open(1, t(9), t(12), 30, 5);
        closed.is_active = false;
        store.upsert_rule(&closed).await.unwrap();
        assert!(store.rule_for_weekday(1).await.unwrap().is_none());
    }
}
