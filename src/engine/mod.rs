mod allocator;
mod bitmap;
mod error;
mod stock;
mod store;

pub use allocator::{AssignOutcome, ReleaseOutcome, SeatAllocator, SeatAssignment};
pub use bitmap::{SegmentError, SegmentRange, SlotCalendar};
pub use error::AllocError;
pub use stock::StockResolver;
pub use store::{
    InMemoryCarriageDirectory, InMemoryInventory, InMemorySeatStore, InMemoryStockCache,
    InMemoryStopDirectory,
};

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::Seat;

/// Shared handle to one seat. The write lock is the seat's critical
/// section: every occupancy mutation happens under it, spanning the
/// availability re-check, the bit update, and the persistence call.
pub type SharedSeat = Arc<RwLock<Seat>>;
