//! booking-server - capacity-limited appointment slots
//!
//! Weekly opening rules generate the slots of a day; each slot has a quota
//! row whose `booked` counter is only ever changed under that row's lock, so
//! concurrent bookers can never push it past `capacity` or below zero.
//!
//! # Layout
//!
//! ```text
//! booking-server/src/
//! ├── api/          # axum routes: /slots/, /book/, /rules/, /health
//! ├── booking/      # slot generator + BookingService
//! ├── db/           # PostgreSQL queries (sqlx)
//! ├── middleware/   # request logging
//! ├── store/        # storage traits, PostgreSQL and in-memory backends
//! ├── config.rs     # environment configuration
//! ├── error.rs      # BookingError -> AppError
//! ├── logger.rs     # tracing setup
//! ├── state.rs      # AppState
//! └── validation.rs # request validation
//! ```

pub mod api;
pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod state;
pub mod store;
pub mod validation;

pub use booking::BookingService;
pub use config::Config;
pub use error::{BookingError, BookingResult};
pub use state::AppState;
