//! Collaborator interfaces. Everything the engine needs from the outside
//! world — stop/carriage lookups, seat persistence, the two stock
//! sources — comes in through these traits so the core stays independent
//! of the surrounding data-access plumbing.

use async_trait::async_trait;

use crate::engine::SharedSeat;
use crate::model::{CarriageId, CarriageInfo, CarriageTypeId, InventoryKey, Seat, StopId, TrainId};

/// Seat persistence failure. The only failure in this crate that is
/// surfaced as an `Err` instead of a degraded outcome.
#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seat store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Stock cache read failure. Never reaches callers — the resolver
/// degrades to the authoritative counter.
#[derive(Debug)]
pub struct CacheError(pub String);

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stock cache error: {}", self.0)
    }
}

impl std::error::Error for CacheError {}

#[async_trait]
pub trait StopLookup: Send + Sync {
    /// Sequence number of `stop` on `train`'s route, if the stop is on it.
    async fn stop_sequence(&self, train: TrainId, stop: StopId) -> Option<u8>;
}

#[async_trait]
pub trait CarriageLookup: Send + Sync {
    async fn by_id(&self, id: CarriageId) -> Option<CarriageInfo>;

    async fn by_number(&self, train: TrainId, number: &str) -> Option<CarriageInfo>;
}

#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Seats of one (train, carriage type), in storage order. The
    /// allocator scans these front to back.
    async fn by_train_and_type(
        &self,
        train: TrainId,
        carriage_type: CarriageTypeId,
    ) -> Result<Vec<SharedSeat>, StoreError>;

    /// Every seat in `carriage` carrying `label`. Labels are not assumed
    /// unique, so this may return more than one seat.
    async fn by_carriage_and_label(
        &self,
        carriage: CarriageId,
        label: &str,
    ) -> Result<Vec<SharedSeat>, StoreError>;

    /// Upsert the durable copy of `seat`.
    async fn save(&self, seat: &Seat) -> Result<(), StoreError>;
}

#[async_trait]
pub trait InventoryReader: Send + Sync {
    /// Authoritative remaining-seat counter; `None` when no record exists.
    async fn remaining(&self, key: &InventoryKey) -> Option<u32>;
}

#[async_trait]
pub trait StockCache: Send + Sync {
    /// Fast-path remaining count. A present zero is a meaningful "sold
    /// out"; absent means unknown.
    async fn remaining(&self, key: &InventoryKey) -> Result<Option<u32>, CacheError>;
}
