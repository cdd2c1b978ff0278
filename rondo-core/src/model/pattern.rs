use fixedbitset::FixedBitSet;

use crate::model::schedule::TripSchedule;

/// the ordered stop sequence shared by a set of trips, plus the trip
/// schedules serving it sorted by first-stop departure.
///
/// trips are assumed not to overtake one another along the pattern: sorted
/// order at the first stop implies sorted order at every stop. the boarding
/// search relies on this; it is not enforced here.
#[derive(Debug, Clone)]
pub struct TripPattern {
    pub route_index: usize,
    pub stops: Box<[usize]>,
    pub trip_schedules: Vec<TripSchedule>,
    /// union of the service codes of this pattern's trips
    pub services_active: FixedBitSet,
    pub has_schedules: bool,
    pub has_frequencies: bool,
}

impl TripPattern {
    pub fn new(
        route_index: usize,
        stops: Vec<usize>,
        mut trip_schedules: Vec<TripSchedule>,
    ) -> TripPattern {
        trip_schedules.sort_by_key(TripSchedule::first_departure);

        let has_frequencies = trip_schedules.iter().any(TripSchedule::is_headway_based);
        let has_schedules = trip_schedules.iter().any(|t| !t.is_headway_based());

        let mut services_active = FixedBitSet::with_capacity(0);
        for trip in trip_schedules.iter() {
            if trip.service_code >= services_active.len() {
                services_active.grow(trip.service_code + 1);
            }
            services_active.insert(trip.service_code);
        }

        TripPattern {
            route_index,
            stops: stops.into_boxed_slice(),
            trip_schedules,
            services_active,
            has_schedules,
            has_frequencies,
        }
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }
}

#[cfg(test)]
mod test {
    use super::TripPattern;
    use crate::model::schedule::{FrequencyEntry, TripSchedule};

    #[test]
    fn test_trips_sorted_by_first_departure() {
        let pattern = TripPattern::new(
            0,
            vec![0, 1],
            vec![
                TripSchedule::scheduled(vec![300, 400], vec![300, 400], 0),
                TripSchedule::scheduled(vec![100, 200], vec![100, 200], 0),
                TripSchedule::scheduled(vec![200, 300], vec![200, 300], 0),
            ],
        );
        let first_departures: Vec<i32> = pattern
            .trip_schedules
            .iter()
            .map(TripSchedule::first_departure)
            .collect();
        assert_eq!(first_departures, vec![100, 200, 300]);
    }

    #[test]
    fn test_flags_and_services() {
        let entry = FrequencyEntry {
            start_time: 0,
            end_time: 3600,
            headway_seconds: 600,
        };
        let mixed = TripPattern::new(
            0,
            vec![0, 1],
            vec![
                TripSchedule::scheduled(vec![100, 200], vec![100, 200], 2),
                TripSchedule::headway_based(vec![0, 100], vec![0, 100], 5, vec![entry]),
            ],
        );
        assert!(mixed.has_schedules);
        assert!(mixed.has_frequencies);
        assert!(mixed.services_active.contains(2));
        assert!(mixed.services_active.contains(5));
        assert!(!mixed.services_active.contains(3));

        let scheduled_only = TripPattern::new(
            0,
            vec![0, 1],
            vec![TripSchedule::scheduled(vec![100, 200], vec![100, 200], 0)],
        );
        assert!(scheduled_only.has_schedules);
        assert!(!scheduled_only.has_frequencies);
    }
}
