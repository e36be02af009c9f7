//! Unified error system for the booking service
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: The `{ code, detail, details? }` JSON error body
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Booking errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorBody};
//!
//! let err = AppError::new(ErrorCode::SlotFull);
//! assert_eq!(err.http_status().as_u16(), 409);
//!
//! let err = AppError::invalid_format("date", "YYYY-MM-DD")
//!     .with_detail("value", "18/10/2026");
//! let body = ErrorBody::from(&err);
//! assert!(body.detail.contains("format"));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
