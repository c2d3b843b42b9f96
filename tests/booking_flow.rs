//! End-to-end booking flow against the public API: display availability,
//! assign a seat, cancel, assign again.

use std::sync::Arc;

use railseat::engine::{
    InMemoryCarriageDirectory, InMemoryInventory, InMemorySeatStore, InMemoryStockCache,
    InMemoryStopDirectory,
};
use railseat::model::{
    CarriageId, CarriageInfo, CarriageTypeId, Day, InventoryKey, Seat, SeatId, StopId, Ticket,
    TrainId,
};
use railseat::{AssignOutcome, ReleaseOutcome, SeatAllocator, SlotCalendar, StockResolver};

const ANCHOR: Day = 20_270;
const TRAIN: TrainId = TrainId(1);
const TYPE: CarriageTypeId = CarriageTypeId(1);

fn key(date: Day) -> InventoryKey {
    InventoryKey {
        train: TRAIN,
        departure_stop: StopId(10),
        arrival_stop: StopId(30),
        travel_date: date,
        carriage_type: TYPE,
    }
}

#[tokio::test]
async fn book_cancel_rebook() {
    let stops = Arc::new(InMemoryStopDirectory::new());
    let carriages = Arc::new(InMemoryCarriageDirectory::new());
    let seats = Arc::new(InMemorySeatStore::new());
    let cache = Arc::new(InMemoryStockCache::new());
    let inventory = Arc::new(InMemoryInventory::new());

    stops.insert(TRAIN, StopId(10), 0);
    stops.insert(TRAIN, StopId(20), 1);
    stops.insert(TRAIN, StopId(30), 2);
    let carriage = CarriageId(5);
    carriages.insert(CarriageInfo {
        id: carriage,
        train: TRAIN,
        number: "01".into(),
        carriage_type: TYPE,
    });
    seats.insert(TRAIN, TYPE, Seat::new(SeatId::new(), carriage, "7F"));
    inventory.set(key(ANCHOR), 1);

    let allocator = SeatAllocator::new(
        SlotCalendar::new(ANCHOR),
        stops.clone(),
        carriages.clone(),
        seats.clone(),
    );
    let resolver = StockResolver::new(cache.clone(), inventory.clone());

    // Display availability comes from the authoritative counter (no cache).
    let shown = resolver
        .get_availability(TRAIN, StopId(10), StopId(30), ANCHOR, TYPE)
        .await;
    assert!(shown.has_stock);
    assert_eq!(shown.count, 1);

    let mut ticket = Ticket {
        train: TRAIN,
        carriage_type: TYPE,
        travel_date: ANCHOR,
        departure_stop: StopId(10),
        arrival_stop: StopId(30),
        carriage_number: None,
        seat_label: None,
    };

    let assignment = match allocator.assign_seat(&ticket).await.unwrap() {
        AssignOutcome::Assigned(a) => a,
        other => panic!("expected assignment, got {other:?}"),
    };
    assert_eq!(assignment.seat_label, "7F");
    assert_eq!(assignment.carriage_number.as_deref(), Some("01"));
    ticket.carriage_number = assignment.carriage_number.clone();
    ticket.seat_label = Some(assignment.seat_label.clone());

    // Train is one seat — a second booking over the same leg is exhausted.
    assert_eq!(
        allocator.assign_seat(&ticket).await.unwrap(),
        AssignOutcome::Exhausted
    );

    // The booking workflow keeps a sold-out marker in the cache; a cached
    // zero must win over the stale counter.
    cache.set(key(ANCHOR), 0);
    let shown = resolver
        .get_availability(TRAIN, StopId(10), StopId(30), ANCHOR, TYPE)
        .await;
    assert!(!shown.has_stock);

    assert_eq!(
        allocator.release_seat(&ticket).await.unwrap(),
        ReleaseOutcome::Released { seats: 1 }
    );

    // Seat is bookable again after the cancellation.
    match allocator.assign_seat(&ticket).await.unwrap() {
        AssignOutcome::Assigned(a) => assert_eq!(a.seat_label, "7F"),
        other => panic!("expected assignment, got {other:?}"),
    }
}
