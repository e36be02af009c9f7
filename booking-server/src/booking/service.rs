//! Booking Service
//!
//! Orchestrates rule lookup, slot generation and the quota ledger:
//!
//! ```text
//! list_slots_with_quota(date)   rule -> generate -> ensure rows -> SlotView
//! resolve_start(date, time)     local wall time -> instant (rule first on DST gaps)
//! try_book_slot(start_at)       rule -> grid check -> ledger.reserve (locked)
//! cancel_booking(start_at)      ledger.release (locked, floored at 0)
//! book(contact, start_at)       try_book_slot -> commit -> create_lead
//! ```
//!
//! The rule is read without a lock on every call; quota state is never cached
//! between requests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use shared::models::{
    Lead, LeadContact, OpeningRule, OpeningRuleUpsert, SlotQuota, SlotView, weekday_index,
};

use super::slots::{generate_slots, resolve_local};
use crate::error::{BookingError, BookingResult};
use crate::store::{LeadStore, QuotaLedger, ReserveOutcome, RuleStore, StoreResult};

#[derive(Clone)]
pub struct BookingService {
    rules: Arc<dyn RuleStore>,
    ledger: Arc<dyn QuotaLedger>,
    leads: Arc<dyn LeadStore>,
    tz: Tz,
    compensate_failed_leads: bool,
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("tz", &self.tz)
            .field("compensate_failed_leads", &self.compensate_failed_leads)
            .finish_non_exhaustive()
    }
}

impl BookingService {
    pub fn new(
        rules: Arc<dyn RuleStore>,
        ledger: Arc<dyn QuotaLedger>,
        leads: Arc<dyn LeadStore>,
        tz: Tz,
    ) -> Self {
        Self {
            rules,
            ledger,
            leads,
            tz,
            compensate_failed_leads: false,
        }
    }

    /// One backend serving all three seams
    pub fn from_store<S>(store: S, tz: Tz) -> Self
    where
        S: RuleStore + QuotaLedger + LeadStore + 'static,
    {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, tz)
    }

    /// Release the reserved place when the lead record cannot be written
    pub fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensate_failed_leads = enabled;
        self
    }

    /// Active rule governing `date`, closed or not
    pub async fn rule_for_date(&self, date: NaiveDate) -> StoreResult<Option<OpeningRule>> {
        self.rules.rule_for_weekday(weekday_index(date)).await
    }

    pub async fn list_rules(&self) -> StoreResult<Vec<OpeningRule>> {
        self.rules.list_rules().await
    }

    /// Admin write: replace the rule of one weekday. Already materialized
    /// quota rows keep their `booked` and pick up the new capacity on next
    /// access.
    pub async fn apply_rule(&self, upsert: &OpeningRuleUpsert) -> StoreResult<OpeningRule> {
        let rule = self.rules.upsert_rule(upsert).await?;
        tracing::info!(
            weekday = rule.weekday,
            is_closed = rule.is_closed(),
            capacity = rule.capacity_per_slot,
            "Opening rule applied"
        );
        Ok(rule)
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.rules.ping().await
    }

    /// Slots of `date` with their quota, materializing missing rows.
    ///
    /// Closed days give an empty list. Rows whose capacity lags behind the
    /// rule are re-aligned (advisory; the booking path re-checks under lock).
    pub async fn list_slots_with_quota(&self, date: NaiveDate) -> BookingResult<Vec<SlotView>> {
        let Some(rule) = self.rule_for_date(date).await? else {
            return Ok(Vec::new());
        };
        let Some((open, close)) = rule.hours() else {
            return Ok(Vec::new());
        };

        let starts: Vec<DateTime<Tz>> =
            generate_slots(date, open, close, rule.slot_duration_minutes, self.tz).collect();
        let (Some(first), Some(last)) = (starts.first(), starts.last()) else {
            return Ok(Vec::new());
        };

        let capacity = rule.capacity_per_slot;
        let from = first.with_timezone(&Utc);
        let to = last.with_timezone(&Utc) + Duration::minutes(i64::from(rule.slot_duration_minutes));
        let mut existing: HashMap<DateTime<Utc>, SlotQuota> = self
            .ledger
            .list_between(from, to)
            .await?
            .into_iter()
            .map(|quota| (quota.start_at, quota))
            .collect();

        let mut views = Vec::with_capacity(starts.len());
        for start in starts {
            let start_utc = start.with_timezone(&Utc);
            let quota = match existing.remove(&start_utc) {
                Some(quota) if quota.capacity == capacity => quota,
                _ => self.ledger.ensure(start_utc, capacity).await?,
            };
            views.push(SlotView::new(start.fixed_offset(), &quota));
        }
        Ok(views)
    }

    /// Pin a requested local date and time to its instant in the business
    /// timezone.
    ///
    /// A wall time skipped by a daylight-saving change has no instant. The
    /// rule is consulted only then: a closed day answers `NotOpen` whatever
    /// the time, an open one `TimeNotOffered`.
    pub async fn resolve_start(&self, date: NaiveDate, time: NaiveTime) -> BookingResult<DateTime<Utc>> {
        if let Some(local) = resolve_local(date, time, self.tz) {
            return Ok(local.with_timezone(&Utc));
        }
        let open = self
            .rule_for_date(date)
            .await?
            .is_some_and(|rule| rule.hours().is_some());
        if open {
            Err(BookingError::TimeNotOffered { date, time })
        } else {
            Err(BookingError::NotOpen { date })
        }
    }

    /// Reserve one place in the slot starting at `start_at`.
    ///
    /// The rule in force decides whether the day is open; an existing quota
    /// row does not. Returns the committed row.
    pub async fn try_book_slot(&self, start_at: DateTime<Utc>) -> BookingResult<SlotQuota> {
        let date = start_at.with_timezone(&self.tz).date_naive();
        let rule = self
            .rule_for_date(date)
            .await?
            .ok_or(BookingError::NotOpen { date })?;
        let (open, close) = rule.hours().ok_or(BookingError::NotOpen { date })?;

        let on_grid = generate_slots(date, open, close, rule.slot_duration_minutes, self.tz)
            .any(|slot| slot.with_timezone(&Utc) == start_at);
        if !on_grid {
            return Err(BookingError::SlotNotOffered { start_at });
        }

        match self.ledger.reserve(start_at, rule.capacity_per_slot).await? {
            ReserveOutcome::Reserved(quota) => {
                tracing::info!(
                    start_at = %start_at,
                    booked = quota.booked,
                    capacity = quota.capacity,
                    "Slot reserved"
                );
                Ok(quota)
            }
            ReserveOutcome::Full(quota) => {
                tracing::info!(
                    start_at = %start_at,
                    booked = quota.booked,
                    capacity = quota.capacity,
                    "Slot full, booking refused"
                );
                Err(BookingError::SlotFull { start_at })
            }
        }
    }

    /// Give back one place. No row, or nothing booked, is a no-op.
    pub async fn cancel_booking(&self, start_at: DateTime<Utc>) -> BookingResult<Option<SlotQuota>> {
        let quota = self.ledger.release(start_at).await?;
        match &quota {
            Some(q) => tracing::info!(
                start_at = %start_at,
                booked = q.booked,
                capacity = q.capacity,
                "Booking cancelled"
            ),
            None => tracing::debug!(start_at = %start_at, "Cancel on unknown slot ignored"),
        }
        Ok(quota)
    }

    /// Reserve the slot, then create the lead once the reservation committed.
    pub async fn book(&self, contact: &LeadContact, start_at: DateTime<Utc>) -> BookingResult<Lead> {
        self.try_book_slot(start_at).await?;

        let source = match self.leads.create_lead(contact, start_at).await {
            Ok(lead) => {
                tracing::info!(lead_id = lead.id, start_at = %start_at, "Lead created");
                return Ok(lead);
            }
            Err(e) => e,
        };

        let released = if self.compensate_failed_leads {
            match self.cancel_booking(start_at).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::error!(start_at = %start_at, error = %e, "Failed to release slot after lead failure");
                    false
                }
            }
        } else {
            tracing::warn!(
                start_at = %start_at,
                "Lead creation failed; the reserved place stays booked without a lead"
            );
            false
        };

        Err(BookingError::LeadFailed {
            start_at,
            released,
            source,
        })
    }

    /// Leads attached to one slot
    pub async fn leads_for_slot(&self, start_at: DateTime<Utc>) -> StoreResult<Vec<Lead>> {
        self.leads.leads_for_slot(start_at).await
    }
}
