use fixedbitset::FixedBitSet;

use crate::search::TRIP_SEARCH_BINARY_THRESHOLD;
use rondo_core::model::{TripPattern, TripSchedule};

/// bracket width the binary phase narrows to before handing the scan back
/// to the linear search.
const BINARY_BRACKET: usize = 10;

/// finds the earliest boardable trip on a pattern at a stop position, given
/// an exclusive upper-bound trip index and an exclusive earliest board
/// time.
///
/// trips are ordered by first-stop departure and assumed not to overtake
/// one another, so in-service trips are ordered at every stop. small trip
/// counts scan linearly from the upper bound downward; large ones bracket
/// the scan with a binary search on the departure at the stop position
/// first.
pub struct TripBoardSearch<'a> {
    pattern: &'a TripPattern,
    services_active: &'a FixedBitSet,
}

impl<'a> TripBoardSearch<'a> {
    pub fn new(pattern: &'a TripPattern, services_active: &'a FixedBitSet) -> TripBoardSearch<'a> {
        TripBoardSearch {
            pattern,
            services_active,
        }
    }

    /// headway-based trips and trips whose service is not running today
    /// cannot be boarded by the scheduled search.
    fn skip(&self, trip: &TripSchedule) -> bool {
        trip.is_headway_based() || !self.services_active.contains(trip.service_code)
    }

    /// returns the index of the earliest trip departing strictly after
    /// `earliest_board_time` at `stop_position`, searching below
    /// `trip_index_upper_bound` (exclusive).
    pub fn search(
        &self,
        trip_index_upper_bound: usize,
        earliest_board_time: i32,
        stop_position: usize,
    ) -> Option<usize> {
        if trip_index_upper_bound <= TRIP_SEARCH_BINARY_THRESHOLD {
            self.search_backward(trip_index_upper_bound, earliest_board_time, stop_position)
        } else {
            self.search_with_binary_bracket(trip_index_upper_bound, earliest_board_time, stop_position)
        }
    }

    /// scans from `upper_bound - 1` down to zero. the first in-service trip
    /// departing too early ends the scan: everything below it departs no
    /// later.
    fn search_backward(
        &self,
        upper_bound: usize,
        earliest_board_time: i32,
        stop_position: usize,
    ) -> Option<usize> {
        let mut candidate = None;
        for index in (0..upper_bound).rev() {
            let trip = &self.pattern.trip_schedules[index];
            if self.skip(trip) {
                continue;
            }
            if trip.departures[stop_position] > earliest_board_time {
                candidate = Some(index);
            } else {
                return candidate;
            }
        }
        candidate
    }

    fn search_with_binary_bracket(
        &self,
        upper_bound: usize,
        earliest_board_time: i32,
        stop_position: usize,
    ) -> Option<usize> {
        let mut lower = 0usize;
        let mut upper = upper_bound;

        // narrow to a bracket; service membership is ignored here
        while upper - lower > BINARY_BRACKET {
            let midpoint = (lower + upper) / 2;
            let trip = &self.pattern.trip_schedules[midpoint];
            if trip.departures[stop_position] > earliest_board_time {
                upper = midpoint + 1;
            } else {
                lower = midpoint;
            }
        }

        if let Some(found) = self.search_backward(upper, earliest_board_time, stop_position) {
            return Some(found);
        }

        // nothing below the bracket was boardable. trips are only sorted on
        // their first stop, so the bracket endpoint may sit on a skipped or
        // locally out-of-order trip; continue scanning upward.
        for index in upper..upper_bound {
            let trip = &self.pattern.trip_schedules[index];
            if self.skip(trip) {
                continue;
            }
            if trip.departures[stop_position] > earliest_board_time {
                return Some(index);
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::TripBoardSearch;
    use fixedbitset::FixedBitSet;
    use rondo_core::model::{FrequencyEntry, TripPattern, TripSchedule};

    fn all_services(n: usize) -> FixedBitSet {
        let mut services = FixedBitSet::with_capacity(n);
        services.insert_range(..);
        services
    }

    /// a two-stop pattern with one trip per departure, 600 s apart.
    fn pattern_with_departures(first_departures: &[i32]) -> TripPattern {
        let trips = first_departures
            .iter()
            .map(|&dep| TripSchedule::scheduled(vec![dep, dep + 600], vec![dep, dep + 600], 0))
            .collect();
        TripPattern::new(0, vec![0, 1], trips)
    }

    #[test]
    fn test_boards_earliest_trip_with_strict_inequality() {
        // departures at 08:05 and 08:06; earliest board 08:01
        let pattern = pattern_with_departures(&[29100, 29160]);
        let services = all_services(1);
        let search = TripBoardSearch::new(&pattern, &services);

        let found = search.search(pattern.trip_schedules.len(), 28860, 0);
        assert_eq!(found, Some(0), "the 08:05 trip wins");

        // a departure exactly at the earliest board time is not boardable
        let found = search.search(pattern.trip_schedules.len(), 29100, 0);
        assert_eq!(found, Some(1));
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        let pattern = pattern_with_departures(&[29100, 29400, 29700]);
        let services = all_services(1);
        let search = TripBoardSearch::new(&pattern, &services);

        // backing up from trip 2: only trips 0 and 1 are considered
        assert_eq!(search.search(2, 28860, 0), Some(0));
        assert_eq!(search.search(1, 28860, 0), Some(0));
        assert_eq!(search.search(0, 28860, 0), None);
    }

    #[test]
    fn test_skips_frequency_and_inactive_trips() {
        let entry = FrequencyEntry {
            start_time: 28800,
            end_time: 36000,
            headway_seconds: 300,
        };
        let pattern = TripPattern::new(
            0,
            vec![0, 1],
            vec![
                TripSchedule::headway_based(vec![0, 600], vec![0, 600], 0, vec![entry]),
                TripSchedule::scheduled(vec![29100, 29700], vec![29100, 29700], 1),
                TripSchedule::scheduled(vec![29400, 30000], vec![29400, 30000], 0),
            ],
        );
        // service 1 is not running today
        let mut services = all_services(2);
        services.set(1, false);
        let search = TripBoardSearch::new(&pattern, &services);

        let found = search.search(pattern.trip_schedules.len(), 28860, 0);
        let trip = &pattern.trip_schedules[found.expect("a trip should be boardable")];
        assert_eq!(trip.departures[0], 29400, "frequency and inactive skipped");
    }

    #[test]
    fn test_no_boardable_trip() {
        let pattern = pattern_with_departures(&[29100, 29400]);
        let services = all_services(1);
        let search = TripBoardSearch::new(&pattern, &services);
        assert_eq!(search.search(pattern.trip_schedules.len(), 30000, 0), None);
    }

    #[test]
    fn test_binary_path_matches_linear_scan() {
        // 120 trips forces the binary bracket; compare against a full
        // linear scan at several probe times
        let departures: Vec<i32> = (0..120).map(|i| 21600 + i * 300).collect();
        let pattern = pattern_with_departures(&departures);
        let services = all_services(1);
        let search = TripBoardSearch::new(&pattern, &services);
        let n_trips = pattern.trip_schedules.len();

        for earliest in [21000, 21600, 25000, 30011, 50000, 56700, 60000] {
            let linear = search.search_backward(n_trips, earliest, 0);
            let hybrid = search.search(n_trips, earliest, 0);
            assert_eq!(hybrid, linear, "earliest board time {earliest}");
            if let Some(index) = hybrid {
                assert!(pattern.trip_schedules[index].departures[0] > earliest);
                if index > 0 {
                    assert!(pattern.trip_schedules[index - 1].departures[0] <= earliest);
                }
            }
        }
    }

    #[test]
    fn test_binary_path_recovers_from_skipped_bracket() {
        // large pattern where every trip below the answer is inactive
        let mut trips: Vec<TripSchedule> = (0..100)
            .map(|i| {
                let dep = 21600 + i * 300;
                TripSchedule::scheduled(vec![dep, dep + 600], vec![dep, dep + 600], 1)
            })
            .collect();
        let last = 21600 + 100 * 300;
        trips.push(TripSchedule::scheduled(
            vec![last, last + 600],
            vec![last, last + 600],
            0,
        ));
        let pattern = TripPattern::new(0, vec![0, 1], trips);

        let mut services = all_services(2);
        services.set(1, false);
        let search = TripBoardSearch::new(&pattern, &services);

        let found = search.search(pattern.trip_schedules.len(), 21600, 0);
        assert_eq!(found, Some(100), "only the in-service trip is boardable");
    }
}
