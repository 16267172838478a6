use serde::Serialize;
use tracing::info;

use crate::analyzers::duration::average_duration_by_member_type;
use crate::analyzers::frequency::{
    day_of_week_frequencies, hour_of_day_frequencies, member_type_frequencies,
};
use crate::analyzers::stations::unique_stations;
use crate::analyzers::types::{DayOfWeek, DurationSummary, FrequencyTable, StationLocation};
use crate::error::Result;
use crate::trips::TripTable;

/// Every derived table for one trip table, i.e. one dashboard refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub trips: usize,
    pub day_of_week: FrequencyTable<DayOfWeek>,
    pub hour_of_day: FrequencyTable<u32>,
    pub member_type: FrequencyTable<String>,
    pub average_duration: DurationSummary,
    pub stations: Vec<StationLocation>,
}

impl TripSummary {
    #[tracing::instrument(skip(table), fields(trips = table.len()))]
    pub fn compute(table: &TripTable) -> Result<Self> {
        let summary = TripSummary {
            trips: table.len(),
            day_of_week: day_of_week_frequencies(table),
            hour_of_day: hour_of_day_frequencies(table),
            member_type: member_type_frequencies(table),
            average_duration: average_duration_by_member_type(table)?,
            stations: unique_stations(table),
        };

        info!(
            stations = summary.stations.len(),
            member_types = summary.member_type.len(),
            "Trip summary computed"
        );
        Ok(summary)
    }
}
