use tracing::debug;

use crate::analyzers::types::DurationSummary;
use crate::analyzers::utility::{group_values, mean};
use crate::error::{Result, TripError};
use crate::trips::TripTable;

/// Mean trip length in minutes per membership type.
///
/// # Errors
///
/// Returns [`TripError::MalformedInput`] if any trip ends before it starts.
/// The loader already drops such rows, so this only fires for tables built
/// by hand.
pub fn average_duration_by_member_type(table: &TripTable) -> Result<DurationSummary> {
    let mut durations = Vec::with_capacity(table.len());

    for (row, record) in table.iter().enumerate() {
        let minutes = record.duration_minutes();
        if minutes < 0.0 {
            return Err(TripError::malformed(format!(
                "trip {row} ends before it starts ({} -> {})",
                record.started_at, record.ended_at
            )));
        }
        durations.push((record.member_casual.clone(), minutes));
    }

    let means = group_values(durations)
        .into_iter()
        .map(|(member_type, values)| (member_type, mean(&values)))
        .collect();

    let summary = DurationSummary::new(means);
    debug!(groups = summary.len(), "Computed average durations");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::test_support::trip;

    #[test]
    fn test_average_duration_by_member_type() {
        let table = TripTable::new(vec![
            trip("2020-04-06T08:00", "2020-04-06T08:10", "A", "B", "member"),
            trip("2020-04-07T08:00", "2020-04-07T08:20", "A", "B", "casual"),
            trip("2020-04-07T09:00", "2020-04-07T09:30", "A", "B", "member"),
        ]);

        let summary = average_duration_by_member_type(&table).unwrap();

        assert_eq!(summary.get("member"), Some(20.0));
        assert_eq!(summary.get("casual"), Some(20.0));
        assert_eq!(summary.len(), 2);
    }

    #[test]
    fn test_fractional_minutes() {
        let mut record = trip("2020-04-06T08:00", "2020-04-06T08:00", "A", "B", "member");
        record.ended_at += chrono::Duration::seconds(90);
        let table = TripTable::new(vec![record]);

        let summary = average_duration_by_member_type(&table).unwrap();
        assert!((summary.get("member").unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let table = TripTable::new(vec![trip(
            "2020-04-06T08:10",
            "2020-04-06T08:00",
            "A",
            "B",
            "member",
        )]);

        let err = average_duration_by_member_type(&table).unwrap_err();
        assert!(matches!(err, TripError::MalformedInput { .. }));
    }

    #[test]
    fn test_empty_table() {
        let summary = average_duration_by_member_type(&TripTable::default()).unwrap();
        assert!(summary.is_empty());
    }
}
