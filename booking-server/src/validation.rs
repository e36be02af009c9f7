//! Input validation helpers
//!
//! Everything here runs before any storage call, so a rejected request never
//! opens a transaction.

use chrono::{NaiveDate, NaiveTime};
use shared::error::AppError;
use shared::models::serde_helpers::parse_hhmm;
use shared::models::{BookingRequest, LeadContact};

// ── Text length limits ──────────────────────────────────────────────

/// First and last names
pub const MAX_NAME_LEN: usize = 200;

/// Phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Text helpers ────────────────────────────────────────────────────

/// Validate that a required string is non-blank and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Optional email: blank counts as absent, otherwise it needs an `@`.
fn validate_email(value: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(email) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if email.len() > MAX_EMAIL_LEN {
        return Err(AppError::validation(format!(
            "email is too long ({} chars, max {MAX_EMAIL_LEN})",
            email.len()
        )));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(Some(email.to_string()))
        }
        _ => Err(AppError::validation("email must be a valid address").with_detail("field", "email")),
    }
}

// ── Date and time ───────────────────────────────────────────────────

/// `YYYY-MM-DD`
pub fn parse_date(value: Option<&str>) -> Result<NaiveDate, AppError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::required("date"))?;
    // chrono also takes signed years of any width
    if raw.len() != 10 || !raw.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(AppError::invalid_format("date", "YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_format("date", "YYYY-MM-DD"))
}

/// `HH:MM` (seconds tolerated)
pub fn parse_time(value: Option<&str>) -> Result<NaiveTime, AppError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::required("time"))?;
    parse_hhmm(raw).ok_or_else(|| AppError::invalid_format("time", "HH:MM"))
}

/// A validated `POST /book/` request
#[derive(Debug, Clone)]
pub struct BookingInput {
    pub contact: LeadContact,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl BookingInput {
    pub fn from_request(req: &BookingRequest) -> Result<Self, AppError> {
        validate_required_text(&req.first_name, "first_name", MAX_NAME_LEN)?;
        validate_required_text(&req.last_name, "last_name", MAX_NAME_LEN)?;
        validate_required_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        let email = validate_email(req.email.as_deref())?;
        let date = parse_date(req.date.as_deref())?;
        let time = parse_time(req.time.as_deref())?;

        Ok(Self {
            contact: LeadContact {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                email,
                phone: req.phone.trim().to_string(),
            },
            date,
            time,
        })
    }
}
