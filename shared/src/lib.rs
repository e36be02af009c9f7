//! Shared types for the slot booking service
//!
//! Common types used by the server and its clients: the unified error
//! system, the booking data model, and small utilities.

pub mod error;
pub mod models;
pub mod util;

pub use http;
