//! Booking request and Lead models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `POST /book/` payload
///
/// Every field defaults to empty so a missing key surfaces as a 400 from the
/// request validator rather than a body-decoding rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    /// `YYYY-MM-DD`, business timezone
    #[serde(default)]
    pub date: Option<String>,
    /// `HH:MM`, business timezone
    #[serde(default)]
    pub time: Option<String>,
}

/// Contact data handed to the lead store once the slot is reserved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
}

/// Lead entity: the downstream business record created after a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Lead {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    /// Reserved slot
    pub appointment_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
