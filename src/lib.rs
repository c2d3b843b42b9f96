//! Seat-occupancy bitmap engine for rail ticketing.
//!
//! Each seat carries one fixed-width bitmask per trackable travel date; bit
//! *i* of a date's mask means "the route segment starting at stop-sequence
//! position *i* is occupied". A journey between two stops is a contiguous
//! bit range, so availability is a single mask test and one physical seat
//! can serve multiple non-overlapping partial-route tickets on the same day.
//!
//! On top of the bitmaps sit two components:
//!
//! - [`engine::SeatAllocator`] — resolves a ticket's stops to sequence
//!   numbers, scans candidate seats and assigns/releases under a per-seat
//!   critical section (no lost-update double booking).
//! - [`engine::StockResolver`] — best-effort remaining-seat figures,
//!   preferring a fast cache and degrading to the authoritative counter.
//!
//! External collaborators (stop/carriage lookup, seat persistence, stock
//! sources) are [`ports`] traits; `DashMap`-backed in-memory
//! implementations live in [`engine`] for embedding and tests.

pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod ports;

pub use engine::{
    AllocError, AssignOutcome, ReleaseOutcome, SeatAllocator, SeatAssignment, SegmentError,
    SegmentRange, SharedSeat, SlotCalendar, StockResolver,
};
pub use model::Availability;
