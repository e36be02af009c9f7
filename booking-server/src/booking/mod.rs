//! Booking core: slot generation and the transactional booking service

pub mod service;
pub mod slots;

pub use service::BookingService;
pub use slots::{SlotStarts, generate_slots, resolve_local};
