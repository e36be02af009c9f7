//! Data models
//!
//! Shared between booking-server and the booking widget (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod booking;
pub mod opening_rule;
pub mod serde_helpers;
pub mod slot_quota;

// Re-exports
pub use booking::*;
pub use opening_rule::*;
pub use slot_quota::*;
