//! Hard capacity limits of the bitmap encoding.

/// Trackable travel dates per seat. Dates outside the rolling window
/// anchored at the calendar's base date have no representable state.
pub const DATE_SLOTS: usize = 10;

/// Width of one occupancy slot in bits — one bit per route segment.
pub const SEGMENT_BITS: u8 = 64;

/// Highest encodable stop sequence number. Trains with more stops than
/// the mask width cannot be represented by this design.
pub const MAX_STOP_SEQUENCE: u8 = 63;
