pub mod config;
pub mod events;
pub mod geocoder;

pub use config::{PostgresDbConfig, connect_postgres_db};
pub use events::PgEventStore;
pub use geocoder::FallbackGeocoder;
