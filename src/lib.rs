pub mod analyzers;
pub mod cache;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod trips;

pub use error::{Result, TripError};
pub use trips::{Coordinates, TripRecord, TripTable};
