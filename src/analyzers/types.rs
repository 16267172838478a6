//! Derived tables produced by the aggregation helpers.

use chrono::Weekday;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::trips::Coordinates;

/// Weekday names in display order, Monday first.
pub const ORDERED_DAYS_OF_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Day of the week a trip started on. Ordering is Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// English name, independent of locale.
    pub fn name(self) -> &'static str {
        ORDERED_DAYS_OF_WEEK[self as usize]
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        DayOfWeek::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trip counts keyed by a categorical value. Keys with no trips are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> FrequencyTable<K> {
    /// Counts every occurrence of each key.
    pub fn count<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut counts = BTreeMap::new();
        for key in keys {
            *counts.entry(key).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, key: &K) -> Option<usize> {
        self.counts.get(key).copied()
    }

    /// Sum of all counts, i.e. the number of trips the table was built from.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// Entries with the busiest key first. Ties keep key order.
    pub fn by_count_desc(&self) -> Vec<(&K, usize)> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }
}

impl FrequencyTable<DayOfWeek> {
    /// Reindexes onto the full Monday-to-Sunday week, filling missing days with zero.
    pub fn full_week(&self) -> [(DayOfWeek, usize); 7] {
        DayOfWeek::ALL.map(|day| (day, self.get(&day).unwrap_or(0)))
    }
}

/// Mean trip duration in minutes, per membership type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DurationSummary {
    means: BTreeMap<String, f64>,
}

impl DurationSummary {
    pub fn new(means: BTreeMap<String, f64>) -> Self {
        Self { means }
    }

    pub fn get(&self, member_type: &str) -> Option<f64> {
        self.means.get(member_type).copied()
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.means.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A station and the location it resolves to. Field names follow what map widgets expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationLocation {
    pub station_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl StationLocation {
    pub fn new(station_name: impl Into<String>, at: Coordinates) -> Self {
        Self {
            station_name: station_name.into(),
            lat: at.lat,
            lon: at.lng,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// A station reported at more than one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationConflict {
    pub station_name: String,
    /// The location the resolver picks.
    pub resolved: Coordinates,
    /// The first record disagreeing with `resolved`.
    pub other: Coordinates,
}

/// One trip drawn as an arc between its two stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub start_station_name: String,
    pub end_station_name: String,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_names_follow_canonical_order() {
        let names: Vec<_> = DayOfWeek::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names, ORDERED_DAYS_OF_WEEK);
        assert!(DayOfWeek::Monday < DayOfWeek::Sunday);
    }

    #[test]
    fn test_from_chrono_weekday() {
        assert_eq!(DayOfWeek::from(Weekday::Mon), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::from(Weekday::Sun), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::Thursday.to_string(), "Thursday");
    }

    #[test]
    fn test_frequency_count_and_total() {
        let table = FrequencyTable::count(["b", "a", "b", "c", "b"]);

        assert_eq!(table.get(&"b"), Some(3));
        assert_eq!(table.get(&"z"), None);
        assert_eq!(table.total(), 5);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_by_count_desc() {
        let table = FrequencyTable::count([1u32, 2, 2, 3, 3, 3]);
        let rows = table.by_count_desc();
        assert_eq!(rows, vec![(&3, 3), (&2, 2), (&1, 1)]);
    }

    #[test]
    fn test_full_week_zero_fills() {
        let table =
            FrequencyTable::count([DayOfWeek::Tuesday, DayOfWeek::Tuesday, DayOfWeek::Sunday]);
        let week = table.full_week();

        assert_eq!(week[0], (DayOfWeek::Monday, 0));
        assert_eq!(week[1], (DayOfWeek::Tuesday, 2));
        assert_eq!(week[6], (DayOfWeek::Sunday, 1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_frequency_serializes_as_map() {
        let table = FrequencyTable::count([DayOfWeek::Monday, DayOfWeek::Friday]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Monday":1,"Friday":1}"#);
    }
}
