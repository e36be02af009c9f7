//! Slot Quota Model

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Counter row for one concrete slot instance, keyed by its start instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SlotQuota {
    pub start_at: DateTime<Utc>,
    /// Snapshot of the rule capacity at creation or last re-alignment
    pub capacity: i32,
    pub booked: i32,
}

impl SlotQuota {
    pub fn new(start_at: DateTime<Utc>, capacity: i32) -> Self {
        Self {
            start_at,
            capacity,
            booked: 0,
        }
    }

    /// Never negative, even if `booked` transiently exceeds `capacity`
    pub fn remaining(&self) -> i32 {
        (self.capacity - self.booked).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.booked >= self.capacity
    }
}

/// One row of `GET /slots/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    /// RFC 3339 instant in the business timezone
    pub start_at: DateTime<FixedOffset>,
    /// Local wall-clock `HH:MM`
    pub time: String,
    pub capacity: i32,
    pub booked: i32,
    pub remaining: i32,
    pub is_full: bool,
}

impl SlotView {
    pub fn new(start_at: DateTime<FixedOffset>, quota: &SlotQuota) -> Self {
        Self {
            time: start_at.format("%H:%M").to_string(),
            start_at,
            capacity: quota.capacity,
            booked: quota.booked,
            remaining: quota.remaining(),
            is_full: quota.is_full(),
        }
    }
}
