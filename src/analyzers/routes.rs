use crate::analyzers::types::RouteSegment;
use crate::trips::TripTable;

/// One segment per trip, from its start station to its end station, in table order.
pub fn route_segments(table: &TripTable) -> Vec<RouteSegment> {
    table
        .iter()
        .map(|r| RouteSegment {
            start_station_name: r.start_station_name.clone(),
            end_station_name: r.end_station_name.clone(),
            start_lat: r.start.lat,
            start_lng: r.start.lng,
            end_lat: r.end.lat,
            end_lng: r.end.lng,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::test_support::trip;

    #[test]
    fn test_route_segments() {
        let table = TripTable::new(vec![
            trip("2020-04-06T08:00", "2020-04-06T08:10", "A", "B", "member"),
            trip("2020-04-06T09:00", "2020-04-06T09:10", "B", "C", "casual"),
        ]);

        let routes = route_segments(&table);

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[1].start_station_name, "B");
        assert_eq!(routes[1].end_station_name, "C");
        assert_eq!(routes[0].start_lat, 41.88);
        assert_eq!(routes[0].end_lng, -87.63);
    }
}
