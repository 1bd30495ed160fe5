pub mod events;
pub mod filters;

pub use events::{EventRecord, Provenance};
pub use filters::SearchFilters;
