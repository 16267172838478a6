//! Station geolocation.
//!
//! A station's location is taken from the first trip that started there. If
//! no trip started there, the first trip that ended there is used. Later
//! records are never consulted, so conflicting coordinates in the source are
//! resolved first-wins; [`station_conflicts`] reports them.

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::analyzers::types::{StationConflict, StationLocation};
use crate::error::{Result, TripError};
use crate::trips::{Coordinates, TripTable};

/// Resolves a single station by scanning the table.
///
/// # Errors
///
/// Returns [`TripError::NotFound`] if no trip starts or ends at `station`.
pub fn find_location(table: &TripTable, station: &str) -> Result<Coordinates> {
    if let Some(record) = table.iter().find(|r| r.start_station_name == station) {
        return Ok(record.start);
    }

    table
        .iter()
        .find(|r| r.end_station_name == station)
        .map(|r| r.end)
        .ok_or_else(|| TripError::not_found(station))
}

/// First-seen locations for every station, built in one pass.
///
/// Resolves exactly like [`find_location`] without rescanning the table per lookup.
#[derive(Debug, Default)]
pub struct StationIndex<'a> {
    starts: HashMap<&'a str, Coordinates>,
    ends: HashMap<&'a str, Coordinates>,
}

impl<'a> StationIndex<'a> {
    pub fn build(table: &'a TripTable) -> Self {
        let mut index = StationIndex::default();
        for record in table {
            index
                .starts
                .entry(record.start_station_name.as_str())
                .or_insert(record.start);
            index
                .ends
                .entry(record.end_station_name.as_str())
                .or_insert(record.end);
        }
        index
    }

    pub fn locate(&self, station: &str) -> Result<Coordinates> {
        self.starts
            .get(station)
            .or_else(|| self.ends.get(station))
            .copied()
            .ok_or_else(|| TripError::not_found(station))
    }

    /// Every station used in either role, sorted.
    pub fn station_names(&self) -> BTreeSet<&'a str> {
        self.starts.keys().chain(self.ends.keys()).copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty() && self.ends.is_empty()
    }
}

/// All distinct stations with their resolved locations, sorted by name.
pub fn unique_stations(table: &TripTable) -> Vec<StationLocation> {
    let index = StationIndex::build(table);
    let stations: Vec<StationLocation> = index
        .station_names()
        .into_iter()
        .filter_map(|name| {
            index
                .locate(name)
                .ok()
                .map(|at| StationLocation::new(name, at))
        })
        .collect();

    debug!(stations = stations.len(), "Resolved unique stations");
    stations
}

/// Like [`unique_stations`], but refuses tables where a station moves.
///
/// # Errors
///
/// Returns [`TripError::ConflictingCoordinates`] for the first conflicting
/// station in name order.
pub fn unique_stations_strict(table: &TripTable) -> Result<Vec<StationLocation>> {
    if let Some(conflict) = station_conflicts(table).into_iter().next() {
        return Err(TripError::ConflictingCoordinates {
            station: conflict.station_name,
            first: conflict.resolved,
            other: conflict.other,
        });
    }
    Ok(unique_stations(table))
}

/// Stations whose records disagree with the resolved location, sorted by name.
pub fn station_conflicts(table: &TripTable) -> Vec<StationConflict> {
    let index = StationIndex::build(table);
    let mut found: HashMap<&str, StationConflict> = HashMap::new();

    for record in table {
        let sightings = [
            (record.start_station_name.as_str(), record.start),
            (record.end_station_name.as_str(), record.end),
        ];

        for (name, at) in sightings {
            if found.contains_key(name) {
                continue;
            }
            let Ok(resolved) = index.locate(name) else {
                continue;
            };
            if resolved != at {
                found.insert(
                    name,
                    StationConflict {
                        station_name: name.to_string(),
                        resolved,
                        other: at,
                    },
                );
            }
        }
    }

    let mut conflicts: Vec<StationConflict> = found.into_values().collect();
    conflicts.sort_by(|a, b| a.station_name.cmp(&b.station_name));

    if !conflicts.is_empty() {
        warn!(
            conflicts = conflicts.len(),
            "Stations reported with more than one location"
        );
    }
    conflicts
}
