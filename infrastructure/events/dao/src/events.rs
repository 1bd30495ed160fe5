use async_trait::async_trait;
use events_models::EventRecord;
use events_store::{EventStore, EventStoreError};
use geo_filter::GeoPoint;
use tracing::{instrument, warn};

/// Source-of-truth query against Postgres. Status and time-window
/// filtering happen in SQL; distance filtering stays in the service.
#[derive(Clone)]
pub struct PgEventStore {
    pool: deadpool_postgres::Pool,
}

const ACTIVE_EVENTS_SQL: &str = "SELECT e.id, e.title, e.description, \
                                 e.category, e.starts_at, e.ends_at, \
                                 v.latitude, v.longitude FROM events e LEFT \
                                 JOIN venues v ON v.id = e.venue_id WHERE \
                                 e.is_active AND e.status NOT IN \
                                 ('cancelled', 'postponed') AND e.ends_at > \
                                 now()";

impl PgEventStore {
    pub fn new(pool: deadpool_postgres::Pool) -> Self { Self { pool } }

    fn map_row(&self, row: &tokio_postgres::Row) -> EventRecord {
        let latitude: Option<f64> = row.get(6);
        let longitude: Option<f64> = row.get(7);

        let venue = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => {
                match GeoPoint::new(latitude, longitude) {
                    Ok(point) => Some(point),
                    Err(e) => {
                        // Bad coordinates in the venue table: the event
                        // stays visible to non-proximity surfaces, but it
                        // cannot be distance-filtered.
                        warn!(error = %e, "venue has invalid coordinates");
                        None
                    }
                }
            }
            _ => None,
        };

        EventRecord {
            id: row.get(0),
            title: row.get(1),
            description: row.get(2),
            category: row.get(3),
            starts_at: row.get(4),
            ends_at: row.get(5),
            venue,
        }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    #[instrument(skip(self))]
    async fn active_upcoming_or_ongoing(
        &self,
    ) -> Result<Vec<EventRecord>, EventStoreError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| EventStoreError::Connection(e.to_string()))?;

        let stmt = client
            .prepare_cached(ACTIVE_EVENTS_SQL)
            .await
            .map_err(|e| EventStoreError::Query(e.to_string()))?;
        let rows = client
            .query(&stmt, &[])
            .await
            .map_err(|e| EventStoreError::Query(e.to_string()))?;

        Ok(rows.iter().map(|row| self.map_row(row)).collect())
    }
}
