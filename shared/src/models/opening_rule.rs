//! Opening Rule Model

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::serde_helpers::option_hhmm;
use crate::error::{AppError, AppResult};

/// Weekday index used everywhere in the booking core: Monday = 0 .. Sunday = 6
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_monday() as i16
}

/// Opening rule entity (weekly hours for one weekday)
///
/// At most one active rule exists per weekday. A rule with either time bound
/// missing describes a closed day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OpeningRule {
    pub id: i64,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: i16,
    #[serde(with = "option_hhmm")]
    pub open_time: Option<NaiveTime>,
    #[serde(with = "option_hhmm")]
    pub close_time: Option<NaiveTime>,
    pub slot_duration_minutes: i32,
    pub capacity_per_slot: i32,
    pub is_active: bool,
}

impl OpeningRule {
    /// Inactive, or either time bound missing
    pub fn is_closed(&self) -> bool {
        !self.is_active || self.open_time.is_none() || self.close_time.is_none()
    }

    /// `(open, close)` when the day is open
    pub fn hours(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.is_closed() {
            return None;
        }
        self.open_time.zip(self.close_time)
    }
}

/// Opening rule as published to the booking widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningRuleView {
    pub weekday: i16,
    #[serde(with = "option_hhmm")]
    pub open_time: Option<NaiveTime>,
    #[serde(with = "option_hhmm")]
    pub close_time: Option<NaiveTime>,
    pub slot_duration_minutes: i32,
    pub capacity_per_slot: i32,
    pub is_active: bool,
    pub is_closed: bool,
}

impl From<&OpeningRule> for OpeningRuleView {
    fn from(rule: &OpeningRule) -> Self {
        Self {
            weekday: rule.weekday,
            open_time: rule.open_time,
            close_time: rule.close_time,
            slot_duration_minutes: rule.slot_duration_minutes,
            capacity_per_slot: rule.capacity_per_slot,
            is_active: rule.is_active,
            is_closed: rule.is_closed(),
        }
    }
}

/// Create-or-replace payload for the rule of one weekday
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningRuleUpsert {
    pub weekday: i16,
    #[serde(default, with = "option_hhmm")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "option_hhmm")]
    pub close_time: Option<NaiveTime>,
    pub slot_duration_minutes: i32,
    pub capacity_per_slot: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl OpeningRuleUpsert {
    /// Open day with the given hours
    pub fn open(
        weekday: i16,
        open_time: NaiveTime,
        close_time: NaiveTime,
        slot_duration_minutes: i32,
        capacity_per_slot: i32,
    ) -> Self {
        Self {
            weekday,
            open_time: Some(open_time),
            close_time: Some(close_time),
            slot_duration_minutes,
            capacity_per_slot,
            is_active: true,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(0..=6).contains(&self.weekday) {
            return Err(AppError::validation(format!(
                "weekday must be between 0 (Monday) and 6 (Sunday), got {}",
                self.weekday
            )));
        }
        if self.slot_duration_minutes <= 0 {
            return Err(AppError::validation("slot_duration_minutes must be positive"));
        }
        if self.capacity_per_slot <= 0 {
            return Err(AppError::validation("capacity_per_slot must be positive"));
        }
        if let (Some(open), Some(close)) = (self.open_time, self.close_time)
            && open >= close
        {
            return Err(AppError::validation("open_time must be before close_time"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn rule(open: Option<NaiveTime>, close: Option<NaiveTime>, active: bool) -> OpeningRule {
        OpeningRule {
            id: 1,
            weekday: 1,
            open_time: open,
            close_time: close,
            slot_duration_minutes: 30,
            capacity_per_slot: 2,
            is_active: active,
        }
    }

    #[test]
    fn test_weekday_index_monday_is_zero() {
        // 2026-10-19 is a Monday
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(weekday_index(monday), 0);
        assert_eq!(weekday_index(monday.succ_opt().unwrap()), 1);
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(weekday_index(sunday), 6);
    }

    #[test]
    fn test_is_closed() {
        assert!(!rule(Some(t(9, 0)), Some(t(12, 0)), true).is_closed());
        assert!(rule(Some(t(9, 0)), Some(t(12, 0)), false).is_closed());
        assert!(rule(None, Some(t(12, 0)), true).is_closed());
        assert!(rule(Some(t(9, 0)), None, true).is_closed());
        assert!(rule(None, None, true).hours().is_none());
    }

    #[test]
    fn test_serialize_times_as_hhmm() {
        let json = serde_json::to_value(rule(Some(t(9, 0)), None, true)).unwrap();
        assert_eq!(json["open_time"], "09:00");
        assert!(json["close_time"].is_null());
    }

    #[test]
    fn test_upsert_validation() {
        assert!(OpeningRuleUpsert::open(1, t(10, 0), t(12, 0), 30, 2).validate().is_ok());
        assert!(OpeningRuleUpsert::open(7, t(10, 0), t(12, 0), 30, 2).validate().is_err());
        assert!(OpeningRuleUpsert::open(1, t(12, 0), t(10, 0), 30, 2).validate().is_err());
        assert!(OpeningRuleUpsert::open(1, t(10, 0), t(12, 0), 0, 2).validate().is_err());
        assert!(OpeningRuleUpsert::open(1, t(10, 0), t(12, 0), 30, 0).validate().is_err());
    }

    #[test]
    fn test_upsert_deserialize_defaults_active() {
        let upsert: OpeningRuleUpsert = serde_json::from_str(
            r#"{"weekday":2,"open_time":"10:00","close_time":"12:00","slot_duration_minutes":30,"capacity_per_slot":2}"#,
        )
        .unwrap();
        assert!(upsert.is_active);
        assert_eq!(upsert.open_time, Some(t(10, 0)));
    }
}
