//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (lost the race for the last place)
            Self::SlotFull => StatusCode::CONFLICT,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::StorageBusy => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::DatabaseError | Self::LeadCreateFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation and "not open" rejections)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::DayNotOpen
            | Self::SlotNotOffered => StatusCode::BAD_REQUEST,
        }
    }
}
