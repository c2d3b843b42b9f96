use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::{Availability, CarriageTypeId, Day, InventoryKey, StopId, TrainId};
use crate::observability;
use crate::ports::{InventoryReader, StockCache};

/// Best-effort remaining-seat figures for display: the fast cache is
/// preferred, the authoritative counter is the fallback. Staleness is
/// tolerated by design; callers that need a strong guarantee re-verify
/// against the authoritative source before capturing payment.
pub struct StockResolver {
    cache: Arc<dyn StockCache>,
    inventory: Arc<dyn InventoryReader>,
}

impl StockResolver {
    pub fn new(cache: Arc<dyn StockCache>, inventory: Arc<dyn InventoryReader>) -> Self {
        Self { cache, inventory }
    }

    /// Remaining stock for one (train, segment, date, carriage type).
    ///
    /// A present cache value wins outright — a cached zero is a
    /// first-class "sold out", not missing data. A cache miss or cache
    /// failure silently degrades to the inventory counter; a missing
    /// inventory record reads as no stock. Never an error.
    pub async fn get_availability(
        &self,
        train: TrainId,
        departure_stop: StopId,
        arrival_stop: StopId,
        travel_date: Day,
        carriage_type: CarriageTypeId,
    ) -> Availability {
        let key = InventoryKey {
            train,
            departure_stop,
            arrival_stop,
            travel_date,
            carriage_type,
        };

        match self.cache.remaining(&key).await {
            Ok(Some(count)) => {
                metrics::counter!(observability::STOCK_CACHE_HITS_TOTAL).increment(1);
                return Availability {
                    has_stock: count > 0,
                    count,
                };
            }
            Ok(None) => {
                metrics::counter!(observability::STOCK_CACHE_MISSES_TOTAL).increment(1);
            }
            Err(e) => {
                metrics::counter!(observability::STOCK_CACHE_ERRORS_TOTAL).increment(1);
                warn!(train = train.0, "stock cache read failed, using inventory: {e}");
            }
        }

        match self.inventory.remaining(&key).await {
            Some(count) => Availability {
                has_stock: count > 0,
                count,
            },
            None => {
                debug!(
                    train = train.0,
                    date = travel_date,
                    carriage_type = carriage_type.0,
                    "no inventory record, reporting sold out"
                );
                Availability {
                    has_stock: false,
                    count: 0,
                }
            }
        }
    }
}
