//! Trip counts by start day, start hour and membership type.

use chrono::{Datelike, Timelike};

use crate::analyzers::types::{DayOfWeek, FrequencyTable};
use crate::trips::TripTable;

/// Trips per weekday of the start time. Days without trips are absent;
/// use [`FrequencyTable::full_week`] for a zero-filled week.
pub fn day_of_week_frequencies(table: &TripTable) -> FrequencyTable<DayOfWeek> {
    FrequencyTable::count(table.iter().map(|r| DayOfWeek::from(r.started_at.weekday())))
}

/// Trips per hour (0-23) of the start time, as stored. Hours without trips are absent.
pub fn hour_of_day_frequencies(table: &TripTable) -> FrequencyTable<u32> {
    FrequencyTable::count(table.iter().map(|r| r.started_at.hour()))
}

/// Trips per membership type. Any category string in the data gets a row.
pub fn member_type_frequencies(table: &TripTable) -> FrequencyTable<String> {
    FrequencyTable::count(table.iter().map(|r| r.member_casual.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::test_support::trip;

    fn sample() -> TripTable {
        TripTable::new(vec![
            trip("2020-04-06T08:00", "2020-04-06T08:10", "A", "B", "member"),
            trip("2020-04-07T08:00", "2020-04-07T08:20", "A", "B", "casual"),
            trip("2020-04-07T23:59", "2020-04-08T00:20", "B", "A", "member"),
            trip("2020-04-12T00:00", "2020-04-12T00:20", "B", "A", "dockless"),
        ])
    }

    #[test]
    fn test_day_of_week_frequencies() {
        let days = day_of_week_frequencies(&sample());

        assert_eq!(days.get(&DayOfWeek::Monday), Some(1));
        assert_eq!(days.get(&DayOfWeek::Tuesday), Some(2));
        assert_eq!(days.get(&DayOfWeek::Sunday), Some(1));
        assert_eq!(days.get(&DayOfWeek::Wednesday), None);
        assert_eq!(days.total(), 4);
    }

    #[test]
    fn test_hour_of_day_frequencies() {
        let hours = hour_of_day_frequencies(&sample());

        assert_eq!(hours.get(&8), Some(2));
        assert_eq!(hours.get(&23), Some(1));
        assert_eq!(hours.get(&0), Some(1));
        assert!(hours.iter().all(|(h, _)| *h <= 23));
        assert_eq!(hours.total(), 4);
    }

    #[test]
    fn test_member_type_frequencies_keeps_unknown_categories() {
        let members = member_type_frequencies(&sample());

        assert_eq!(members.get(&"member".to_string()), Some(2));
        assert_eq!(members.get(&"casual".to_string()), Some(1));
        assert_eq!(members.get(&"dockless".to_string()), Some(1));
        assert_eq!(members.len(), 3);
    }

    #[test]
    fn test_empty_table_gives_empty_tables() {
        let empty = TripTable::default();
        assert!(day_of_week_frequencies(&empty).is_empty());
        assert!(hour_of_day_frequencies(&empty).is_empty());
        assert!(member_type_frequencies(&empty).is_empty());
    }
}
