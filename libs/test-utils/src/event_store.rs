use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use events_models::EventRecord;
use events_store::{
    EventStore, EventStoreError, GeocodeError, Geocoder,
};
use geo_filter::GeoPoint;
use tokio::sync::RwLock;

/// Programmable event-store double: fixed result set, a failure switch,
/// and a query counter for asserting cache hits never reach the store.
#[derive(Default)]
pub struct StaticEventStore {
    events: RwLock<Vec<EventRecord>>,
    failing: AtomicBool,
    queries: AtomicUsize,
    delay: RwLock<Option<Duration>>,
}

impl StaticEventStore {
    pub fn with_events(events: Vec<EventRecord>) -> Self {
        Self {
            events: RwLock::new(events),
            ..Default::default()
        }
    }

    pub fn empty() -> Self { Self::default() }

    pub async fn set_events(&self, events: Vec<EventRecord>) {
        *self.events.write().await = events;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every query sleep before answering, to exercise deadlines.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// How many times the source of truth was actually queried.
    pub fn query_count(&self) -> usize { self.queries.load(Ordering::SeqCst) }
}

#[async_trait]
impl EventStore for StaticEventStore {
    async fn active_upcoming_or_ongoing(
        &self,
    ) -> Result<Vec<EventRecord>, EventStoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(EventStoreError::Connection(
                "injected failure".to_string(),
            ));
        }

        Ok(self.events.read().await.clone())
    }
}

/// Geocoder double backed by a name → point table.
#[derive(Default)]
pub struct StaticGeocoder {
    table: HashMap<String, GeoPoint>,
    failing: bool,
}

impl StaticGeocoder {
    pub fn empty() -> Self { Self::default() }

    pub fn with_entry(name: &str, point: GeoPoint) -> Self {
        let mut table = HashMap::new();
        table.insert(name.to_lowercase(), point);
        Self {
            table,
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            table: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn resolve(
        &self, city: &str,
    ) -> Result<Option<GeoPoint>, GeocodeError> {
        if self.failing {
            return Err(GeocodeError::Unavailable(
                "injected failure".to_string(),
            ));
        }
        Ok(self.table.get(&city.trim().to_lowercase()).copied())
    }
}
