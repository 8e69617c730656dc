use moka::future::Cache;
use std::time::Duration;

use crate::model::location::{LocationReport, LocationState};

/// Per-student geolocation slots, keyed by NIM.
///
/// The browser resolves a slot asynchronously; pages poll it until it leaves
/// `Pending`. A missing slot reads as `Pending`.
#[derive(Clone)]
pub struct LocationSlots {
    cache: Cache<String, LocationState>,
}

impl LocationSlots {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Arms a fresh request, discarding any earlier result.
    pub async fn begin(&self, nim: &str) {
        self.cache.insert(nim.to_string(), LocationState::Pending).await;
        log::debug!("Location request armed for {}", nim);
    }

    pub async fn resolve(&self, nim: &str, report: LocationReport) -> LocationState {
        let state = LocationState::from(report);
        self.cache.insert(nim.to_string(), state.clone()).await;
        state
    }

    /// Drops a consumed fix so the next check-in has to ask the browser again.
    pub async fn clear(&self, nim: &str) {
        self.cache.invalidate(nim).await;
    }

    pub async fn state(&self, nim: &str) -> LocationState {
        self.cache.get(nim).await.unwrap_or(LocationState::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::location::{Coordinates, GeoError};

    #[actix_web::test]
    async fn slot_moves_from_pending_to_result() {
        let slots = LocationSlots::new(Duration::from_secs(60));
        assert_eq!(slots.state("2201001").await, LocationState::Pending);

        slots.begin("2201001").await;
        assert_eq!(slots.state("2201001").await, LocationState::Pending);

        let coords = Coordinates {
            latitude: -6.2,
            longitude: 106.8,
            accuracy: Some(15.0),
        };
        slots.resolve("2201001", LocationReport::Located(coords)).await;
        assert_eq!(slots.state("2201001").await.coordinates(), Some(coords));

        // a new request clears the previous fix
        slots.begin("2201001").await;
        assert_eq!(slots.state("2201001").await, LocationState::Pending);
    }

    #[actix_web::test]
    async fn slots_are_per_student() {
        let slots = LocationSlots::new(Duration::from_secs(60));
        slots
            .resolve("a", LocationReport::Failed { error: GeoError::Timeout })
            .await;
        assert!(matches!(slots.state("a").await, LocationState::Error { reason: GeoError::Timeout, .. }));
        assert_eq!(slots.state("b").await, LocationState::Pending);
    }

    #[actix_web::test]
    async fn cleared_slot_reads_as_pending() {
        let slots = LocationSlots::new(Duration::from_secs(60));
        let coords = Coordinates {
            latitude: -6.2,
            longitude: 106.8,
            accuracy: None,
        };
        slots.resolve("2201001", LocationReport::Located(coords)).await;

        slots.clear("2201001").await;
        assert_eq!(slots.state("2201001").await.coordinates(), None);
        assert_eq!(slots.state("2201001").await, LocationState::Pending);
    }
}
