//! Output formatting for derived tables.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of every
//! table a chart or map front end consumes.

use csv::Writer;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::{DurationSummary, RouteSegment, TripSummary};
use crate::error::Result;
use crate::trips::TripRecord;

const TRIP_COLUMNS: [&str; 9] = [
    "started_at",
    "ended_at",
    "start_station_name",
    "start_lat",
    "start_lng",
    "end_station_name",
    "end_lat",
    "end_lng",
    "member_casual",
];

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `key_column,number_of_trips` rows in the order given.
pub fn write_counts_csv<W, K, I>(writer: W, key_column: &str, rows: I) -> Result<()>
where
    W: Write,
    K: Display,
    I: IntoIterator<Item = (K, usize)>,
{
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record([key_column, "number_of_trips"])?;
    for (key, count) in rows {
        wtr.write_record([key.to_string(), count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `member_type,average_duration` rows.
pub fn write_durations_csv<W: Write>(writer: W, summary: &DurationSummary) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["member_type", "average_duration"])?;
    for (member_type, minutes) in summary.iter() {
        wtr.write_record([member_type.to_string(), minutes.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Serializes flat rows (stations, routes) with a header taken from the field names.
///
/// An empty slice produces an empty file, since there is no row to take headers from.
pub fn write_rows_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes raw trips, one per line, with flattened coordinates.
pub fn write_trips_csv<W: Write>(writer: W, trips: &[TripRecord]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(TRIP_COLUMNS)?;
    for t in trips {
        wtr.write_record([
            t.started_at.to_string(),
            t.ended_at.to_string(),
            t.start_station_name.clone(),
            t.start.lat.to_string(),
            t.start.lng.to_string(),
            t.end_station_name.clone(),
            t.end.lat.to_string(),
            t.end.lng.to_string(),
            t.member_casual.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes every derived table into `dir` as its own CSV file and returns the paths written.
///
/// Creates `dir` if it does not already exist.
#[tracing::instrument(skip(dir, summary, routes), fields(dir = %dir.display()))]
pub fn export_tables(
    dir: &Path,
    summary: &TripSummary,
    routes: &[RouteSegment],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let mut create = |name: &str| -> Result<File> {
        let path = dir.join(name);
        debug!(path = %path.display(), "Writing table");
        let file = File::create(&path)?;
        written.push(path);
        Ok(file)
    };

    write_counts_csv(create("day_of_week.csv")?, "day", summary.day_of_week.iter())?;
    write_counts_csv(create("hour_of_day.csv")?, "hour", summary.hour_of_day.iter())?;
    write_counts_csv(
        create("member_type.csv")?,
        "member_type",
        summary.member_type.iter(),
    )?;
    write_durations_csv(create("average_duration.csv")?, &summary.average_duration)?;
    write_rows_csv(create("stations.csv")?, &summary.stations)?;
    write_rows_csv(create("routes.csv")?, routes)?;

    info!(files = written.len(), "Export complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{FrequencyTable, StationLocation, route_segments};
    use crate::trips::test_support::trip;
    use crate::trips::{Coordinates, TripTable};
    use pretty_assertions::assert_eq;

    fn to_string(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> TripTable {
        TripTable::new(vec![
            trip("2020-04-06T08:00", "2020-04-06T08:10", "A", "B", "member"),
            trip("2020-04-07T08:00", "2020-04-07T08:20", "A", "B", "casual"),
        ])
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample());
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        let table = FrequencyTable::count(["member", "member", "casual"]);
        write_json(&mut buf, &table).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["member"], 2);
        assert_eq!(value["casual"], 1);
    }

    #[test]
    fn test_write_counts_csv() {
        let mut buf = Vec::new();
        let table = FrequencyTable::count([8u32, 8, 17]);
        write_counts_csv(&mut buf, "hour", table.iter()).unwrap();

        assert_eq!(to_string(buf), "hour,number_of_trips\n8,2\n17,1\n");
    }

    #[test]
    fn test_write_durations_csv() {
        let summary = crate::analyzers::average_duration_by_member_type(&sample()).unwrap();
        let mut buf = Vec::new();
        write_durations_csv(&mut buf, &summary).unwrap();

        assert_eq!(
            to_string(buf),
            "member_type,average_duration\ncasual,20\nmember,10\n"
        );
    }

    #[test]
    fn test_write_rows_csv_uses_field_names() {
        let stations = vec![StationLocation::new("A", Coordinates::new(41.5, -87.25))];
        let mut buf = Vec::new();
        write_rows_csv(&mut buf, &stations).unwrap();

        assert_eq!(to_string(buf), "station_name,lat,lon\nA,41.5,-87.25\n");
    }

    #[test]
    fn test_write_trips_csv() {
        let table = sample();
        let mut buf = Vec::new();
        write_trips_csv(&mut buf, table.head(1)).unwrap();

        let text = to_string(buf);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("started_at,ended_at"));
        assert!(lines[1].starts_with("2020-04-06 08:00:00,2020-04-06 08:10:00,A,"));
    }

    #[test]
    fn test_export_tables_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts");
        let table = sample();
        let summary = TripSummary::compute(&table).unwrap();

        let written = export_tables(&out, &summary, &route_segments(&table)).unwrap();

        assert_eq!(written.len(), 6);
        assert!(written.iter().all(|p| p.exists()));

        let days = fs::read_to_string(out.join("day_of_week.csv")).unwrap();
        assert_eq!(days, "day,number_of_trips\nMonday,1\nTuesday,1\n");
    }
}
