//! Booking-layer error type
//!
//! `BookingError` bridges storage faults (`StoreError`) and business
//! rejections to the API-layer error (`AppError`), so handlers propagate with
//! `?` and every rejection reaches the client with its own code and status.

use axum::response::IntoResponse;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BookingError {
    /// No active rule for the weekday, or the rule marks it closed
    #[error("Bookings are not open on {date}")]
    NotOpen { date: NaiveDate },

    /// Open day, but the instant is not one of its slot starts
    #[error("{start_at} is not a slot start")]
    SlotNotOffered { start_at: DateTime<Utc> },

    /// Open day, but the wall time was skipped by a daylight-saving change
    #[error("{time} does not exist on {date}")]
    TimeNotOffered { date: NaiveDate, time: NaiveTime },

    /// `booked >= capacity` once the row lock was held
    #[error("Slot {start_at} is full")]
    SlotFull { start_at: DateTime<Utc> },

    /// The place was reserved but the lead record could not be written
    #[error("Lead for {start_at} could not be created: {source}")]
    LeadFailed {
        start_at: DateTime<Utc>,
        /// Whether the place was given back
        released: bool,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Busy(msg) => {
                tracing::warn!(error = %msg, "Storage busy");
                AppError::new(ErrorCode::StorageBusy)
            }
            StoreError::Database(msg) | StoreError::Corrupt(msg) => {
                tracing::error!(error = %msg, "Storage error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::NotOpen { date } => {
                AppError::new(ErrorCode::DayNotOpen).with_detail("date", date.to_string())
            }
            BookingError::SlotNotOffered { start_at } => AppError::new(ErrorCode::SlotNotOffered)
                .with_detail("start_at", start_at.to_rfc3339()),
            BookingError::TimeNotOffered { date, time } => AppError::new(ErrorCode::SlotNotOffered)
                .with_detail("date", date.to_string())
                .with_detail("time", time.format("%H:%M").to_string()),
            BookingError::SlotFull { start_at } => {
                AppError::new(ErrorCode::SlotFull).with_detail("start_at", start_at.to_rfc3339())
            }
            BookingError::LeadFailed {
                start_at,
                released,
                source,
            } => {
                tracing::error!(
                    start_at = %start_at,
                    released,
                    error = %source,
                    "Lead creation failed after reservation"
                );
                AppError::new(ErrorCode::LeadCreateFailed)
                    .with_detail("start_at", start_at.to_rfc3339())
            }
            BookingError::Store(store_err) => store_err.into(),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for booking-layer results
pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use http::StatusCode;

    fn slot() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_rejections_map_to_distinct_codes() {
        let full: AppError = BookingError::SlotFull { start_at: slot() }.into();
        assert_eq!(full.code, ErrorCode::SlotFull);
        assert_eq!(full.http_status(), StatusCode::CONFLICT);

        let closed: AppError = BookingError::NotOpen {
            date: slot().date_naive(),
        }
        .into();
        assert_eq!(closed.code, ErrorCode::DayNotOpen);
        assert_eq!(closed.http_status(), StatusCode::BAD_REQUEST);
        assert_ne!(full.message, closed.message);

        let off_grid: AppError = BookingError::SlotNotOffered { start_at: slot() }.into();
        assert_eq!(off_grid.http_status(), StatusCode::BAD_REQUEST);

        let skipped: AppError = BookingError::TimeNotOffered {
            date: slot().date_naive(),
            time: NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
        }
        .into();
        assert_eq!(skipped.code, ErrorCode::SlotNotOffered);
        assert_eq!(skipped.details.as_ref().unwrap()["time"], "02:30");
    }

    #[test]
    fn test_store_faults() {
        let busy: AppError = BookingError::Store(StoreError::Busy("lock timeout".into())).into();
        assert_eq!(busy.http_status(), StatusCode::SERVICE_UNAVAILABLE);

        let db: AppError = BookingError::Store(StoreError::Database("gone".into())).into();
        assert_eq!(db.code, ErrorCode::DatabaseError);
        // internal message is not leaked
        assert!(!db.message.contains("gone"));
    }

    #[test]
    fn test_lead_failure_is_server_error() {
        let err: AppError = BookingError::LeadFailed {
            start_at: slot(),
            released: false,
            source: StoreError::Database("insert failed".into()),
        }
        .into();
        assert_eq!(err.code, ErrorCode::LeadCreateFailed);
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
