use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::model::{
    CarriageId, CarriageInfo, CarriageTypeId, InventoryKey, Seat, SeatId, StopId, TrainId,
};
use crate::ports::{
    CacheError, CarriageLookup, InventoryReader, SeatStore, StockCache, StopLookup, StoreError,
};

use super::SharedSeat;

// ── Seats ────────────────────────────────────────────────────────

/// `DashMap`-backed seat store for embedding and tests.
///
/// Live seats are `SharedSeat` handles; `save` writes a detached durable
/// copy (what a database row would hold), so tests can observe whether a
/// mutation was actually persisted.
pub struct InMemorySeatStore {
    seats: DashMap<SeatId, SharedSeat>,
    by_train_type: DashMap<(TrainId, CarriageTypeId), Vec<SeatId>>,
    by_carriage: DashMap<CarriageId, Vec<SeatId>>,
    persisted: DashMap<SeatId, Seat>,
}

impl Default for InMemorySeatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySeatStore {
    pub fn new() -> Self {
        Self {
            seats: DashMap::new(),
            by_train_type: DashMap::new(),
            by_carriage: DashMap::new(),
            persisted: DashMap::new(),
        }
    }

    /// Register a seat at provisioning time. Scan order is insertion order.
    pub fn insert(
        &self,
        train: TrainId,
        carriage_type: CarriageTypeId,
        seat: Seat,
    ) -> SharedSeat {
        let id = seat.id;
        let carriage = seat.carriage_id;
        let shared: SharedSeat = Arc::new(RwLock::new(seat.clone()));
        self.persisted.insert(id, seat);
        self.by_train_type
            .entry((train, carriage_type))
            .or_default()
            .push(id);
        self.by_carriage.entry(carriage).or_default().push(id);
        self.seats.insert(id, shared.clone());
        shared
    }

    pub fn seat(&self, id: &SeatId) -> Option<SharedSeat> {
        self.seats.get(id).map(|e| e.value().clone())
    }

    /// The durable copy last written by `save` (or the provisioned state).
    pub fn persisted(&self, id: &SeatId) -> Option<Seat> {
        self.persisted.get(id).map(|e| e.value().clone())
    }
}

#[async_trait]
impl SeatStore for InMemorySeatStore {
    async fn by_train_and_type(
        &self,
        train: TrainId,
        carriage_type: CarriageTypeId,
    ) -> Result<Vec<SharedSeat>, StoreError> {
        let ids = self
            .by_train_type
            .get(&(train, carriage_type))
            .map(|e| e.value().clone())
            .unwrap_or_default();
        Ok(ids.iter().filter_map(|id| self.seat(id)).collect())
    }

    async fn by_carriage_and_label(
        &self,
        carriage: CarriageId,
        label: &str,
    ) -> Result<Vec<SharedSeat>, StoreError> {
        let ids = self
            .by_carriage
            .get(&carriage)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        let mut matches = Vec::new();
        for id in ids {
            if let Some(seat) = self.seat(&id)
                && seat.read().await.label == label
            {
                matches.push(seat);
            }
        }
        Ok(matches)
    }

    async fn save(&self, seat: &Seat) -> Result<(), StoreError> {
        self.persisted.insert(seat.id, seat.clone());
        Ok(())
    }
}

// ── Stops ────────────────────────────────────────────────────────

/// Stop → sequence-number directory.
pub struct InMemoryStopDirectory {
    sequences: DashMap<(TrainId, StopId), u8>,
}

impl Default for InMemoryStopDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStopDirectory {
    pub fn new() -> Self {
        Self {
            sequences: DashMap::new(),
        }
    }

    pub fn insert(&self, train: TrainId, stop: StopId, sequence: u8) {
        self.sequences.insert((train, stop), sequence);
    }
}

#[async_trait]
impl StopLookup for InMemoryStopDirectory {
    async fn stop_sequence(&self, train: TrainId, stop: StopId) -> Option<u8> {
        self.sequences.get(&(train, stop)).map(|e| *e.value())
    }
}

// ── Carriages ────────────────────────────────────────────────────

pub struct InMemoryCarriageDirectory {
    by_id: DashMap<CarriageId, CarriageInfo>,
}

impl Default for InMemoryCarriageDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCarriageDirectory {
    pub fn new() -> Self {
        Self {
            by_id: DashMap::new(),
        }
    }

    pub fn insert(&self, info: CarriageInfo) {
        self.by_id.insert(info.id, info);
    }
}

#[async_trait]
impl CarriageLookup for InMemoryCarriageDirectory {
    async fn by_id(&self, id: CarriageId) -> Option<CarriageInfo> {
        self.by_id.get(&id).map(|e| e.value().clone())
    }

    async fn by_number(&self, train: TrainId, number: &str) -> Option<CarriageInfo> {
        self.by_id
            .iter()
            .find(|e| e.value().train == train && e.value().number == number)
            .map(|e| e.value().clone())
    }
}

// ── Stock sources ────────────────────────────────────────────────

/// Authoritative remaining-seat counters.
pub struct InMemoryInventory {
    counts: DashMap<InventoryKey, u32>,
}

impl Default for InMemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    pub fn set(&self, key: InventoryKey, count: u32) {
        self.counts.insert(key, count);
    }
}

#[async_trait]
impl InventoryReader for InMemoryInventory {
    async fn remaining(&self, key: &InventoryKey) -> Option<u32> {
        self.counts.get(key).map(|e| *e.value())
    }
}

/// Fast-path stock counters with fault injection for degraded-path tests.
pub struct InMemoryStockCache {
    counts: DashMap<InventoryKey, u32>,
    failing: AtomicBool,
}

impl Default for InMemoryStockCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStockCache {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set(&self, key: InventoryKey, count: u32) {
        self.counts.insert(key, count);
    }

    pub fn evict(&self, key: &InventoryKey) {
        self.counts.remove(key);
    }

    /// Make every subsequent read fail, as an unreachable cache would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl StockCache for InMemoryStockCache {
    async fn remaining(&self, key: &InventoryKey) -> Result<Option<u32>, CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError("cache unreachable".into()));
        }
        Ok(self.counts.get(key).map(|e| *e.value()))
    }
}
