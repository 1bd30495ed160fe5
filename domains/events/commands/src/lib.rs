pub mod invalidate_city;

pub use invalidate_city::{
    InvalidateCityCacheCommand, InvalidateCityCacheHandler,
};
