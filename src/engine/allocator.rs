use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::model::{CarriageTypeId, Day, StopId, Ticket, TrainId};
use crate::observability;
use crate::ports::{CarriageLookup, SeatStore, StopLookup};

use super::bitmap::{SegmentRange, SlotCalendar};
use super::error::AllocError;
use super::SharedSeat;

/// Explicit assignment result, so callers can tell "assigned",
/// "exhausted" and "malformed request" apart without inferring intent
/// from the absence of a side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned(SeatAssignment),
    /// Every candidate seat was occupied on the requested segment/date.
    Exhausted,
    /// A stop id did not resolve on the train's route, or the journey
    /// cannot be encoded in the mask width. Nothing was mutated or saved.
    Unresolvable,
}

/// What the booking workflow needs to issue the ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAssignment {
    pub seat: crate::model::SeatId,
    pub seat_label: String,
    /// Best-effort: `None` when the carriage lookup failed. Assignment
    /// proceeds regardless.
    pub carriage_number: Option<String>,
    pub travel_date: Day,
    pub segment: SegmentRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Every seat matching (carriage, label) was vacated — labels are not
    /// assumed unique, so this is intentional bulk behavior.
    Released { seats: usize },
    Unresolvable,
    UnknownCarriage,
    NoMatchingSeat,
}

/// Resolves booking requests to stop-sequence ranges and performs
/// scan/assign/release against the seat store.
///
/// Concurrency: scan-mutate-persist is raced by other allocators, so a
/// candidate's availability is re-checked under its write lock before any
/// mutation. The loser of a race observes the seat as taken and moves on
/// to the next candidate; two callers can never both lock the same
/// segment bits.
pub struct SeatAllocator {
    calendar: SlotCalendar,
    stops: Arc<dyn StopLookup>,
    carriages: Arc<dyn CarriageLookup>,
    seats: Arc<dyn SeatStore>,
}

impl SeatAllocator {
    pub fn new(
        calendar: SlotCalendar,
        stops: Arc<dyn StopLookup>,
        carriages: Arc<dyn CarriageLookup>,
        seats: Arc<dyn SeatStore>,
    ) -> Self {
        Self {
            calendar,
            stops,
            carriages,
            seats,
        }
    }

    pub fn calendar(&self) -> SlotCalendar {
        self.calendar
    }

    /// Resolve both stop ids to a validated sequence range. `None` covers
    /// both unresolved stops and journeys the mask cannot encode.
    async fn resolve_segment(
        &self,
        train: TrainId,
        departure_stop: StopId,
        arrival_stop: StopId,
    ) -> Option<SegmentRange> {
        let dep = self.stops.stop_sequence(train, departure_stop).await;
        let arr = self.stops.stop_sequence(train, arrival_stop).await;
        let (Some(dep), Some(arr)) = (dep, arr) else {
            warn!(
                train = train.0,
                departure = departure_stop.0,
                arrival = arrival_stop.0,
                "stop resolution failed"
            );
            return None;
        };
        match SegmentRange::new(dep, arr) {
            Ok(segment) => Some(segment),
            Err(e) => {
                warn!(train = train.0, "journey not encodable: {e}");
                None
            }
        }
    }

    /// First seat of (train, carriage type), in storage order, free on the
    /// requested segment/date. `Ok(None)` when stop resolution fails or
    /// every seat is taken. Read-only — no seat is mutated.
    pub async fn find_available_seat(
        &self,
        train: TrainId,
        carriage_type: CarriageTypeId,
        travel_date: Day,
        departure_stop: StopId,
        arrival_stop: StopId,
    ) -> Result<Option<SharedSeat>, AllocError> {
        let Some(segment) = self
            .resolve_segment(train, departure_stop, arrival_stop)
            .await
        else {
            return Ok(None);
        };
        self.find_available_seat_by_sequence(train, carriage_type, travel_date, segment)
            .await
    }

    /// Variant for callers that already hold resolved sequence numbers.
    pub async fn find_available_seat_by_sequence(
        &self,
        train: TrainId,
        carriage_type: CarriageTypeId,
        travel_date: Day,
        segment: SegmentRange,
    ) -> Result<Option<SharedSeat>, AllocError> {
        let candidates = self.seats.by_train_and_type(train, carriage_type).await?;
        metrics::histogram!(observability::SEAT_SCAN_LENGTH).record(candidates.len() as f64);

        let Some(slot) = self.calendar.slot_index(travel_date) else {
            // Dates outside the window are unconstrained by the bitmap:
            // every seat answers "available".
            return Ok(candidates.into_iter().next());
        };
        let mask = segment.mask();
        for seat in candidates {
            if seat.read().await.occupancy.is_free(slot, mask) {
                return Ok(Some(seat));
            }
        }
        Ok(None)
    }

    /// Resolve the ticket's stops, scan for a free seat, and lock it for
    /// the segment/date. The chosen seat's occupancy is persisted before
    /// the in-memory copy is updated; a failed save leaves it untouched.
    pub async fn assign_seat(&self, ticket: &Ticket) -> Result<AssignOutcome, AllocError> {
        let Some(segment) = self
            .resolve_segment(ticket.train, ticket.departure_stop, ticket.arrival_stop)
            .await
        else {
            metrics::counter!(observability::ASSIGNMENTS_TOTAL, "outcome" => "unresolvable")
                .increment(1);
            return Ok(AssignOutcome::Unresolvable);
        };

        let candidates = self
            .seats
            .by_train_and_type(ticket.train, ticket.carriage_type)
            .await?;
        metrics::histogram!(observability::SEAT_SCAN_LENGTH).record(candidates.len() as f64);

        let slot = self.calendar.slot_index(ticket.travel_date);
        let mask = segment.mask();

        for seat in candidates {
            if let Some(slot) = slot {
                // Cheap pre-check; the write lock below re-checks.
                if !seat.read().await.occupancy.is_free(slot, mask) {
                    continue;
                }
            }

            let mut guard = seat.write().await;
            if let Some(slot) = slot
                && !guard.occupancy.is_free(slot, mask)
            {
                // Lost the race for this seat — keep scanning.
                continue;
            }

            let mut updated = guard.clone();
            if let Some(slot) = slot {
                updated.occupancy.occupy(slot, mask);
            }
            self.seats.save(&updated).await?;
            *guard = updated;

            let carriage_number = match self.carriages.by_id(guard.carriage_id).await {
                Some(info) => Some(info.number),
                None => {
                    debug!(seat = %guard.id, "carriage lookup failed, assigning without number");
                    None
                }
            };

            if let Some(slot) = slot {
                info!(
                    seat = %guard.id,
                    train = ticket.train.0,
                    date = ticket.travel_date,
                    segment = %segment,
                    "seat assigned, slot now {}",
                    guard.occupancy.summary(slot)
                );
            }
            metrics::counter!(observability::ASSIGNMENTS_TOTAL, "outcome" => "assigned")
                .increment(1);
            return Ok(AssignOutcome::Assigned(SeatAssignment {
                seat: guard.id,
                seat_label: guard.label.clone(),
                carriage_number,
                travel_date: ticket.travel_date,
                segment,
            }));
        }

        debug!(
            train = ticket.train.0,
            carriage_type = ticket.carriage_type.0,
            date = ticket.travel_date,
            "no seat available for segment {segment}"
        );
        metrics::counter!(observability::ASSIGNMENTS_TOTAL, "outcome" => "exhausted").increment(1);
        Ok(AssignOutcome::Exhausted)
    }

    /// Vacate the ticket's segment on every seat matching its carriage
    /// number and seat label. Unresolvable inputs degrade to a no-op
    /// outcome rather than an error.
    pub async fn release_seat(&self, ticket: &Ticket) -> Result<ReleaseOutcome, AllocError> {
        let Some(segment) = self
            .resolve_segment(ticket.train, ticket.departure_stop, ticket.arrival_stop)
            .await
        else {
            metrics::counter!(observability::RELEASES_TOTAL, "outcome" => "unresolvable")
                .increment(1);
            return Ok(ReleaseOutcome::Unresolvable);
        };

        let (Some(number), Some(label)) = (&ticket.carriage_number, &ticket.seat_label) else {
            debug!(train = ticket.train.0, "ticket carries no seat assignment");
            metrics::counter!(observability::RELEASES_TOTAL, "outcome" => "no_match").increment(1);
            return Ok(ReleaseOutcome::NoMatchingSeat);
        };

        let Some(carriage) = self.carriages.by_number(ticket.train, number).await else {
            debug!(train = ticket.train.0, number = %number, "carriage not found, nothing to release");
            metrics::counter!(observability::RELEASES_TOTAL, "outcome" => "unknown_carriage")
                .increment(1);
            return Ok(ReleaseOutcome::UnknownCarriage);
        };

        let matches = self.seats.by_carriage_and_label(carriage.id, label).await?;
        if matches.is_empty() {
            debug!(carriage = carriage.id.0, label = %label, "no matching seat");
            metrics::counter!(observability::RELEASES_TOTAL, "outcome" => "no_match").increment(1);
            return Ok(ReleaseOutcome::NoMatchingSeat);
        }

        let slot = self.calendar.slot_index(ticket.travel_date);
        let mask = segment.mask();
        let mut released = 0usize;
        for seat in matches {
            let mut guard = seat.write().await;
            let mut updated = guard.clone();
            if let Some(slot) = slot {
                updated.occupancy.vacate(slot, mask);
            }
            self.seats.save(&updated).await?;
            *guard = updated;
            released += 1;
        }

        info!(
            train = ticket.train.0,
            carriage = carriage.id.0,
            label = %label,
            date = ticket.travel_date,
            segment = %segment,
            "released {released} seat(s)"
        );
        metrics::counter!(observability::RELEASES_TOTAL, "outcome" => "released").increment(1);
        Ok(ReleaseOutcome::Released { seats: released })
    }
}
