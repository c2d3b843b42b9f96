use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::limits::{DATE_SLOTS, SEGMENT_BITS};

/// Days since the Unix epoch — the only date type.
pub type Day = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrainId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StopId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CarriageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CarriageTypeId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId(pub Ulid);

impl SeatId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SeatId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One seat's occupancy: one fixed-width bitmask per trackable date.
///
/// Bit *i* of slot *d* means the segment starting at stop-sequence
/// position *i* is occupied by some ticket on this seat, on the date
/// mapped to slot *d*. Independent OR/AND on bit ranges is what lets a
/// seat be free on segment A–B while occupied on B–C within one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeatOccupancy {
    slots: [u64; DATE_SLOTS],
}

impl SeatOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no bit of `mask` is set in the date slot.
    pub fn is_free(&self, slot: usize, mask: u64) -> bool {
        self.slots[slot] & mask == 0
    }

    /// Set the masked bit range. Idempotent.
    pub fn occupy(&mut self, slot: usize, mask: u64) {
        self.slots[slot] |= mask;
    }

    /// Clear the masked bit range. Idempotent.
    pub fn vacate(&mut self, slot: usize, mask: u64) {
        self.slots[slot] &= !mask;
    }

    pub fn slot(&self, slot: usize) -> u64 {
        self.slots[slot]
    }

    /// Occupied segment start positions in one date slot.
    pub fn occupied_segments(&self, slot: usize) -> Vec<u8> {
        let bits = self.slots[slot];
        (0..SEGMENT_BITS).filter(|i| bits & (1u64 << i) != 0).collect()
    }

    /// Human-readable occupancy of one date slot, for log output.
    pub fn summary(&self, slot: usize) -> String {
        let occupied = self.occupied_segments(slot);
        if occupied.is_empty() {
            return "free".into();
        }
        let list: Vec<String> = occupied.iter().map(|s| s.to_string()).collect();
        format!("occupied at segments {}", list.join(","))
    }
}

/// A physical seat. Rows are created at fleet provisioning; only the
/// occupancy is mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub carriage_id: CarriageId,
    /// Printed seat label, e.g. "12A". Not assumed unique per carriage.
    pub label: String,
    pub occupancy: SeatOccupancy,
}

impl Seat {
    pub fn new(id: SeatId, carriage_id: CarriageId, label: impl Into<String>) -> Self {
        Self {
            id,
            carriage_id,
            label: label.into(),
            occupancy: SeatOccupancy::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriageInfo {
    pub id: CarriageId,
    pub train: TrainId,
    /// Printed carriage number, e.g. "03".
    pub number: String,
    pub carriage_type: CarriageTypeId,
}

/// Composite key shared by the authoritative inventory counter and the
/// stock cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryKey {
    pub train: TrainId,
    pub departure_stop: StopId,
    pub arrival_stop: StopId,
    pub travel_date: Day,
    pub carriage_type: CarriageTypeId,
}

/// A ticket as seen by this core: the journey plus, once assigned, the
/// issued carriage number and seat label (release needs both).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub train: TrainId,
    pub carriage_type: CarriageTypeId,
    pub travel_date: Day,
    pub departure_stop: StopId,
    pub arrival_stop: StopId,
    pub carriage_number: Option<String>,
    pub seat_label: Option<String>,
}

/// Best-effort remaining-stock figure for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub has_stock: bool,
    pub count: u32,
}
