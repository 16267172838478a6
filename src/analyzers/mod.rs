//! Trip aggregation helpers.
//!
//! Every function here takes an immutable [`TripTable`](crate::trips::TripTable)
//! and returns a new, smaller table: counts per day, hour and membership type,
//! mean duration per membership type, station locations and route segments.

pub mod duration;
pub mod frequency;
pub mod routes;
pub mod stations;
pub mod summary;
pub mod types;
pub mod utility;

pub use duration::average_duration_by_member_type;
pub use frequency::{day_of_week_frequencies, hour_of_day_frequencies, member_type_frequencies};
pub use routes::route_segments;
pub use stations::{
    StationIndex, find_location, station_conflicts, unique_stations, unique_stations_strict,
};
pub use summary::TripSummary;
pub use types::{
    DayOfWeek, DurationSummary, FrequencyTable, ORDERED_DAYS_OF_WEEK, RouteSegment,
    StationConflict, StationLocation,
};
