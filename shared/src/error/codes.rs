//! Unified error codes for the booking service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors (input validation, lookups)
//! - 4xxx: Booking errors (business-rule rejections)
//! - 9xxx: System errors (storage, downstream hooks)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the booking widget can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 4xxx: Booking ====================
    /// Every place in the slot is taken
    SlotFull = 4001,
    /// No active opening rule for that day, or the day is closed
    DayNotOpen = 4002,
    /// Requested start time is not one of the day's slots
    SlotNotOffered = 4003,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Downstream lead record could not be created
    LeadCreateFailed = 9101,
    /// Storage contention (lock timeout, deadlock), retry later
    StorageBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Booking
            ErrorCode::SlotFull => "This slot is full, please pick another time",
            ErrorCode::DayNotOpen => "Bookings are not open on this day, please pick another day",
            ErrorCode::SlotNotOffered => "This time is outside the opening hours",

            // System
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::LeadCreateFailed => "The booking could not be recorded",
            ErrorCode::StorageBusy => "System busy, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Booking
            4001 => Ok(ErrorCode::SlotFull),
            4002 => Ok(ErrorCode::DayNotOpen),
            4003 => Ok(ErrorCode::SlotNotOffered),

            // System
            9002 => Ok(ErrorCode::DatabaseError),
            9101 => Ok(ErrorCode::LeadCreateFailed),
            9404 => Ok(ErrorCode::StorageBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
