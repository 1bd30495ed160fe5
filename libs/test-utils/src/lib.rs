//! Shared test doubles and fixture builders. Every proximity-service
//! collaborator is a trait, so behavioral tests run entirely in process.

pub mod cache;
pub mod event_store;
pub mod fixtures;

pub use cache::{CountingCacheStore, FailingCacheStore, SlowCacheStore};
pub use event_store::{StaticEventStore, StaticGeocoder};
pub use fixtures::{MUMBAI, event_at, event_near};
