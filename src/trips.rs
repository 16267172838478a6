//! Trip records and the immutable table the aggregation helpers read from.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// A latitude/longitude pair as reported in the trip export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// One bicycle rental. Every field is present; incomplete rows never get this far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub start_station_name: String,
    pub start: Coordinates,
    pub end_station_name: String,
    pub end: Coordinates,
    pub member_casual: String,
}

impl TripRecord {
    /// Trip length in fractional minutes. Negative if the record is malformed.
    pub fn duration_minutes(&self) -> f64 {
        let delta = self.ended_at - self.started_at;
        // milliseconds keep sub-second precision without overflow concerns
        delta.num_milliseconds() as f64 / 60_000.0
    }
}

/// Ordered rows of a single source file.
///
/// Helpers only take `&TripTable` and return new values; the narrowing
/// operations here (`head`, `filter_by_start_station`) build a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    records: Vec<TripRecord>,
}

impl TripTable {
    pub fn new(records: Vec<TripRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TripRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    /// The first `n` trips, or the whole table if it is shorter.
    pub fn head(&self, n: usize) -> &[TripRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// A new table holding only trips that started at `station`.
    pub fn filter_by_start_station(&self, station: &str) -> TripTable {
        self.records
            .iter()
            .filter(|r| r.start_station_name == station)
            .cloned()
            .collect()
    }

    /// Distinct start station names in first-seen order.
    pub fn start_station_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(|r| r.start_station_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

impl FromIterator<TripRecord> for TripTable {
    fn from_iter<I: IntoIterator<Item = TripRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TripTable {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    pub fn trip(start: &str, end: &str, from: &str, to: &str, member: &str) -> TripRecord {
        TripRecord {
            started_at: ts(start),
            ended_at: ts(end),
            start_station_name: from.to_string(),
            start: Coordinates::new(41.88, -87.62),
            end_station_name: to.to_string(),
            end: Coordinates::new(41.90, -87.63),
            member_casual: member.to_string(),
        }
    }
}
