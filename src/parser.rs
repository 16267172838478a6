//! CSV loader for bike-share trip exports.
//!
//! Checks that the required columns exist, drops rows with a missing required
//! field or an end time before the start time, and parses the rest into a
//! [`TripTable`]. A required field is missing when its cell is empty, holds
//! one of the usual NA markers, or lies past the end of a short row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Result, TripError};
use crate::trips::{Coordinates, TripRecord, TripTable};

/// Columns every source file must carry. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "start_station_name",
    "end_station_name",
    "start_lat",
    "start_lng",
    "end_lat",
    "end_lng",
    "started_at",
    "ended_at",
    "member_casual",
];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Cell values that mark a missing value, in addition to an empty cell.
const MISSING_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "-NaN", "nan", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
];

/// A row as it sits in the file. Empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct RawTripRow {
    started_at: Option<String>,
    ended_at: Option<String>,
    start_station_name: Option<String>,
    end_station_name: Option<String>,
    start_lat: Option<String>,
    start_lng: Option<String>,
    end_lat: Option<String>,
    end_lng: Option<String>,
    member_casual: Option<String>,
}

/// Counters describing what the loader kept and discarded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub dropped_incomplete: usize,
    pub dropped_negative_duration: usize,
}

impl LoadReport {
    pub fn kept(&self) -> usize {
        self.rows_read - self.dropped_incomplete - self.dropped_negative_duration
    }
}

/// Loads a trip table from disk. Paths ending in `.gz` are decompressed.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_trips(path: impl AsRef<Path>) -> Result<TripTable> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);

    let (table, report) = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!("Reading gzip-compressed trip file");
        parse_trips_with_report(GzDecoder::new(file))?
    } else {
        parse_trips_with_report(file)?
    };

    info!(
        rows_read = report.rows_read,
        kept = report.kept(),
        dropped_incomplete = report.dropped_incomplete,
        dropped_negative_duration = report.dropped_negative_duration,
        "Trip table loaded"
    );
    Ok(table)
}

/// Parses trip CSV data from any reader.
pub fn parse_trips<R: Read>(reader: R) -> Result<TripTable> {
    Ok(parse_trips_with_report(reader)?.0)
}

/// Parses trip CSV data and reports how many rows were dropped and why.
///
/// # Errors
///
/// Returns [`TripError::MalformedInput`] if a required column is missing, if a
/// row has more fields than the header, or if a timestamp or coordinate cannot
/// be parsed. Infinite coordinates count as unparseable.
pub fn parse_trips_with_report<R: Read>(reader: R) -> Result<(TripTable, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_required_columns(&headers)?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    let mut row = StringRecord::new();

    while rdr.read_record(&mut row)? {
        report.rows_read += 1;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        if row.len() > headers.len() {
            return Err(TripError::malformed(format!(
                "line {line}: {} fields, header has {}",
                row.len(),
                headers.len()
            )));
        }
        while row.len() < headers.len() {
            row.push_field("");
        }

        let raw: RawTripRow = row
            .deserialize(Some(&headers))
            .map_err(|e| TripError::malformed(format!("line {line}: {e}")))?;

        let Some(record) = into_record(raw, line)? else {
            report.dropped_incomplete += 1;
            continue;
        };

        if record.ended_at < record.started_at {
            warn!(
                line,
                started_at = %record.started_at,
                ended_at = %record.ended_at,
                "Dropping trip that ends before it starts"
            );
            report.dropped_negative_duration += 1;
            continue;
        }

        records.push(record);
    }

    debug!(
        rows_read = report.rows_read,
        dropped_incomplete = report.dropped_incomplete,
        "Finished parsing trip rows"
    );

    Ok((TripTable::new(records), report))
}

fn check_required_columns(headers: &StringRecord) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TripError::malformed(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

/// `Ok(None)` means the row had an empty or missing required field.
fn into_record(raw: RawTripRow, line: u64) -> Result<Option<TripRecord>> {
    let RawTripRow {
        started_at: Some(started_at),
        ended_at: Some(ended_at),
        start_station_name: Some(start_station_name),
        end_station_name: Some(end_station_name),
        start_lat: Some(start_lat),
        start_lng: Some(start_lng),
        end_lat: Some(end_lat),
        end_lng: Some(end_lng),
        member_casual: Some(member_casual),
    } = raw
    else {
        return Ok(None);
    };

    let fields = [
        &started_at,
        &ended_at,
        &start_station_name,
        &end_station_name,
        &start_lat,
        &start_lng,
        &end_lat,
        &end_lng,
        &member_casual,
    ];
    if fields.iter().any(|f| is_missing(f)) {
        return Ok(None);
    }

    Ok(Some(TripRecord {
        started_at: parse_timestamp_at(&started_at, line)?,
        ended_at: parse_timestamp_at(&ended_at, line)?,
        start: Coordinates::new(
            parse_coordinate(&start_lat, "start_lat", line)?,
            parse_coordinate(&start_lng, "start_lng", line)?,
        ),
        end: Coordinates::new(
            parse_coordinate(&end_lat, "end_lat", line)?,
            parse_coordinate(&end_lng, "end_lng", line)?,
        ),
        start_station_name,
        end_station_name,
        member_casual,
    }))
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || MISSING_MARKERS.contains(&value)
}

fn parse_coordinate(value: &str, column: &str, line: u64) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TripError::malformed(format!("line {line}: invalid {column} '{value}'"))),
    }
}

fn parse_timestamp_at(value: &str, line: u64) -> Result<NaiveDateTime> {
    parse_timestamp(value)
        .ok_or_else(|| TripError::malformed(format!("line {line}: invalid timestamp '{value}'")))
}

/// Parses a trip timestamp as wall-clock time.
///
/// Offsets on RFC 3339 input are dropped, not applied: hours are reported
/// exactly as stored.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
