use serde::{Deserialize, Serialize};

use crate::limits::{DATE_SLOTS, MAX_STOP_SEQUENCE};
use crate::model::Day;

// ── Date-slot mapping ─────────────────────────────────────────────

/// Maps travel dates onto the rolling window of occupancy slots.
///
/// The anchor is explicit injected configuration, never process-wide
/// state: two calendars with different anchors map the same date to
/// different slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCalendar {
    anchor: Day,
}

impl SlotCalendar {
    pub fn new(anchor: Day) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> Day {
        self.anchor
    }

    /// Occupancy slot for `date`, or `None` when the date falls outside
    /// the trackable window. Untrackable dates have no representable
    /// state — occupancy checks answer "available" optimistically.
    pub fn slot_index(&self, date: Day) -> Option<usize> {
        let offset = date - self.anchor;
        if (0..DATE_SLOTS as i64).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }
}

// ── Segment masks ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    /// Departure does not precede arrival.
    Inverted { departure: u8, arrival: u8 },
    /// A sequence number exceeds the mask width.
    OutOfRange(u8),
}

impl std::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentError::Inverted { departure, arrival } => {
                write!(f, "departure {departure} does not precede arrival {arrival}")
            }
            SegmentError::OutOfRange(seq) => {
                write!(f, "stop sequence {seq} exceeds mask width")
            }
        }
    }
}

impl std::error::Error for SegmentError {}

/// Stop-sequence range `[departure, arrival)` of one journey, validated
/// against the mask width at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRange {
    departure: u8,
    arrival: u8,
}

impl SegmentRange {
    pub fn new(departure: u8, arrival: u8) -> Result<Self, SegmentError> {
        if arrival > MAX_STOP_SEQUENCE {
            return Err(SegmentError::OutOfRange(arrival));
        }
        if departure >= arrival {
            return Err(SegmentError::Inverted { departure, arrival });
        }
        Ok(Self { departure, arrival })
    }

    pub fn departure(&self) -> u8 {
        self.departure
    }

    pub fn arrival(&self) -> u8 {
        self.arrival
    }

    /// Mask with exactly the bits `[departure, arrival)` set — one bit per
    /// segment the journey rides over.
    pub fn mask(&self) -> u64 {
        let width = self.arrival - self.departure;
        ((1u64 << width) - 1) << self.departure
    }

    /// True iff the two journeys ride a common segment. Adjacent ranges
    /// (one arriving where the other departs) do not overlap.
    pub fn overlaps(&self, other: &SegmentRange) -> bool {
        self.mask() & other.mask() != 0
    }
}

impl std::fmt::Display for SegmentRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.departure, self.arrival)
    }
}
