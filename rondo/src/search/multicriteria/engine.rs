use fixedbitset::FixedBitSet;

use rondo_core::model::{AccessTable, TransitNetwork};

use crate::model::{error::SearchError, request::SearchRequest};
use crate::search::board_search::TripBoardSearch;
use crate::search::multicriteria::label::{McLabel, ParetoBag};
use crate::search::prefilter::{prefilter_patterns, FilteredPatterns};
use crate::search::MINIMUM_BOARD_WAIT;

/// a label riding a vehicle along one pattern scan.
struct ActiveRide {
    source: McLabel,
    trip: usize,
    board_stop: usize,
    board_time: i32,
}

/// multi-criteria RAPTOR for a single departure time. per stop and round a
/// Pareto bag over (arrival, rides, total wait, total in-vehicle) replaces
/// the scalar best; boarding and relaxation reuse the scalar engine's
/// pattern-scan skeleton and trip boarding search.
pub struct MultiCriteriaEngine<'a> {
    network: &'a TransitNetwork,
    request: &'a SearchRequest,
    services_active: FixedBitSet,
    patterns: FilteredPatterns,
}

impl<'a> MultiCriteriaEngine<'a> {
    pub fn new(
        network: &'a TransitNetwork,
        request: &'a SearchRequest,
    ) -> Result<MultiCriteriaEngine<'a>, SearchError> {
        request.validate()?;
        let services_active = network.active_services_for_date(request.date);
        let patterns = prefilter_patterns(network, &services_active, &request.transit_modes);
        Ok(MultiCriteriaEngine {
            network,
            request,
            services_active,
            patterns,
        })
    }

    /// routes one departure time and returns the final Pareto bag for every
    /// stop. bags carry forward across rounds, so each result holds the
    /// Pareto set over all ride counts up to `max_rides`.
    pub fn route(&self, access: &AccessTable, departure_time: i32) -> Vec<ParetoBag> {
        let n_stops = self.network.stop_count();
        let cutoff = departure_time + self.request.max_trip_duration_seconds();

        let mut bags: Vec<ParetoBag> = vec![ParetoBag::default(); n_stops];
        let mut touched = FixedBitSet::with_capacity(n_stops);
        for (stop, access_seconds) in access.iter() {
            let arrival = departure_time + access_seconds;
            if arrival <= cutoff && bags[stop].insert(McLabel::access(arrival)) {
                touched.insert(stop);
            }
        }

        for round in 1..=self.request.max_rides {
            let previous_bags = bags.clone();
            let mut round_touched = FixedBitSet::with_capacity(n_stops);

            let patterns_touched = self.patterns_touched(&touched);
            for filtered_index in patterns_touched.ones() {
                let pattern_index = self.patterns.scheduled[filtered_index];
                self.scan_pattern(
                    pattern_index,
                    round,
                    cutoff,
                    &previous_bags,
                    &touched,
                    &mut bags,
                    &mut round_touched,
                );
            }

            self.relax_transfers(round, cutoff, &mut bags, &mut round_touched);

            if round_touched.is_clear() {
                break;
            }
            touched = round_touched;
        }

        bags
    }

    fn patterns_touched(&self, touched: &FixedBitSet) -> FixedBitSet {
        let mut patterns_touched = FixedBitSet::with_capacity(self.patterns.scheduled.len());
        for stop in touched.ones() {
            for &original in self.network.patterns_for_stop(stop) {
                if let Some(filtered) = self.patterns.scheduled_for_original[original] {
                    patterns_touched.insert(filtered);
                }
            }
        }
        patterns_touched
    }

    #[allow(clippy::too_many_arguments)]
    fn scan_pattern(
        &self,
        pattern_index: usize,
        round: u32,
        cutoff: i32,
        previous_bags: &[ParetoBag],
        touched: &FixedBitSet,
        bags: &mut [ParetoBag],
        round_touched: &mut FixedBitSet,
    ) {
        let pattern = &self.network.patterns()[pattern_index];
        let board_search = TripBoardSearch::new(pattern, &self.services_active);
        let n_trips = pattern.trip_schedules.len();
        let mut rides: Vec<ActiveRide> = Vec::new();

        for (position, &stop) in pattern.stops.iter().enumerate() {
            // alight every active ride before boarding here
            for ride in rides.iter() {
                let schedule = &pattern.trip_schedules[ride.trip];
                let alight_time = schedule.arrivals[position];
                if alight_time > cutoff {
                    continue;
                }
                let label = McLabel {
                    arrival_time: alight_time,
                    rounds: round,
                    total_wait: ride.source.total_wait
                        + (ride.board_time - ride.source.arrival_time),
                    total_in_vehicle: ride.source.total_in_vehicle
                        + (alight_time - ride.board_time),
                    board_pattern: pattern_index as i32,
                    board_stop: ride.board_stop as i32,
                    transferred: false,
                };
                if bags[stop].insert(label) {
                    round_touched.insert(stop);
                }
            }

            if !touched.contains(stop) {
                continue;
            }
            for label in previous_bags[stop].labels() {
                // never immediately re-ride the pattern that produced the
                // label (for transfers, the pre-transfer pattern)
                if label.board_pattern == pattern_index as i32 {
                    continue;
                }
                let earliest_board_time = label.arrival_time + MINIMUM_BOARD_WAIT;
                if let Some(found) = board_search.search(n_trips, earliest_board_time, position) {
                    let board_time = pattern.trip_schedules[found].departures[position];
                    rides.push(ActiveRide {
                        source: *label,
                        trip: found,
                        board_stop: stop,
                        board_time,
                    });
                }
            }
        }
    }

    /// walks transfer edges from every label that alighted this round.
    fn relax_transfers(
        &self,
        round: u32,
        cutoff: i32,
        bags: &mut [ParetoBag],
        round_touched: &mut FixedBitSet,
    ) {
        let walk_speed = self.request.walk_speed_millimeters_per_second();
        let max_walk = self.request.max_walk_millimeters();

        let alighted: Vec<usize> = round_touched.ones().collect();
        for stop in alighted {
            let sources: Vec<McLabel> = bags[stop]
                .labels()
                .iter()
                .filter(|label| label.rounds == round && !label.transferred)
                .copied()
                .collect();
            if sources.is_empty() {
                continue;
            }
            for transfer in self.network.transfers_for_stop(stop) {
                if transfer.distance_millimeters >= max_walk {
                    continue;
                }
                let walk_seconds = transfer.distance_millimeters / walk_speed;
                for source in sources.iter() {
                    let arrival = source.arrival_time + walk_seconds;
                    if arrival > cutoff {
                        continue;
                    }
                    let label = McLabel {
                        arrival_time: arrival,
                        transferred: true,
                        ..*source
                    };
                    if bags[transfer.target_stop].insert(label) {
                        round_touched.insert(transfer.target_stop);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::MultiCriteriaEngine;
    use crate::model::request::SearchRequest;
    use chrono::NaiveDate;
    use rondo_core::model::{
        AccessTable, RouteInfo, ServiceCalendar, ServicePeriod, Transfer, TransferTable,
        TransitMode, TransitNetwork, TripPattern, TripSchedule,
    };
    use std::collections::HashSet;

    const T0800: i32 = 8 * 3600;

    fn request(max_rides: u32) -> SearchRequest {
        SearchRequest {
            from_time: T0800,
            to_time: T0800 + 60,
            date: NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"),
            max_rides,
            max_trip_duration_minutes: 120,
            max_walk_time_minutes: 20,
            walk_speed_meters_per_second: 1.3,
            transit_modes: HashSet::from([TransitMode::Bus]),
            monte_carlo_draws_per_minute: 1,
            monte_carlo_seed: None,
            retain_paths: false,
        }
    }

    fn network(patterns: Vec<TripPattern>, stop_count: usize) -> TransitNetwork {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date");
        TransitNetwork::new(
            stop_count,
            patterns,
            vec![RouteInfo {
                mode: TransitMode::Bus,
            }],
            TransferTable::new(stop_count),
            ServiceCalendar::new(vec![ServicePeriod::daily(start, end)]),
        )
        .expect("test network should build")
    }

    fn one_trip_pattern(stops: Vec<usize>, times: Vec<i32>) -> TripPattern {
        TripPattern::new(
            0,
            stops,
            vec![TripSchedule::scheduled(times.clone(), times, 0)],
        )
    }

    #[test]
    fn test_keeps_incomparable_alternatives() {
        // a slow direct trip A -> C and a faster two-ride connection
        // A -> B -> C: neither dominates the other
        let patterns = vec![
            one_trip_pattern(vec![0, 2], vec![T0800 + 300, T0800 + 3000]),
            one_trip_pattern(vec![0, 1], vec![T0800 + 300, T0800 + 600]),
            one_trip_pattern(vec![1, 2], vec![T0800 + 900, T0800 + 1500]),
        ];
        let network = network(patterns, 3);
        let request = request(4);
        let engine = MultiCriteriaEngine::new(&network, &request).expect("engine builds");

        let access: AccessTable = vec![(0, 60)].into_iter().collect();
        let bags = engine.route(&access, T0800);

        let arrivals: Vec<(i32, u32)> = bags[2]
            .labels()
            .iter()
            .map(|label| (label.arrival_time, label.rounds))
            .collect();
        assert!(arrivals.contains(&(T0800 + 3000, 1)), "direct: {arrivals:?}");
        assert!(
            arrivals.contains(&(T0800 + 1500, 2)),
            "two rides: {arrivals:?}"
        );
    }

    #[test]
    fn test_dominated_connection_is_pruned() {
        // the two-ride option arrives later than the direct trip and costs
        // a ride: it must not survive
        let patterns = vec![
            one_trip_pattern(vec![0, 2], vec![T0800 + 300, T0800 + 1200]),
            one_trip_pattern(vec![0, 1], vec![T0800 + 300, T0800 + 600]),
            one_trip_pattern(vec![1, 2], vec![T0800 + 900, T0800 + 2400]),
        ];
        let network = network(patterns, 3);
        let request = request(4);
        let engine = MultiCriteriaEngine::new(&network, &request).expect("engine builds");

        let access: AccessTable = vec![(0, 60)].into_iter().collect();
        let bags = engine.route(&access, T0800);

        let two_ride_survives = bags[2].labels().iter().any(|label| label.rounds == 2);
        assert!(!two_ride_survives, "labels: {:?}", bags[2].labels());
        assert_eq!(bags[2].best_arrival(), Some(T0800 + 1200));
    }

    #[test]
    fn test_transfer_labels_do_not_chain() {
        // one ride to B, transfers B -> C and C -> D; only C is walkable
        let mut transfers = TransferTable::new(4);
        transfers.add(
            1,
            Transfer {
                target_stop: 2,
                distance_millimeters: 156_000,
            },
        );
        transfers.add(
            2,
            Transfer {
                target_stop: 3,
                distance_millimeters: 156_000,
            },
        );
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date");
        let network = TransitNetwork::new(
            4,
            vec![one_trip_pattern(vec![0, 1], vec![T0800 + 300, T0800 + 900])],
            vec![RouteInfo {
                mode: TransitMode::Bus,
            }],
            transfers,
            ServiceCalendar::new(vec![ServicePeriod::daily(start, end)]),
        )
        .expect("test network should build");
        let request = request(2);
        let engine = MultiCriteriaEngine::new(&network, &request).expect("engine builds");

        let access: AccessTable = vec![(0, 60)].into_iter().collect();
        let bags = engine.route(&access, T0800);

        assert_eq!(bags[2].best_arrival(), Some(T0800 + 900 + 120));
        assert!(bags[3].is_empty(), "no double-walk past the vehicle stop");
    }

    #[test]
    fn test_access_only_with_zero_rides() {
        let network = network(
            vec![one_trip_pattern(vec![0, 1], vec![T0800 + 300, T0800 + 900])],
            2,
        );
        let request = request(0);
        let engine = MultiCriteriaEngine::new(&network, &request).expect("engine builds");

        let access: AccessTable = vec![(0, 60)].into_iter().collect();
        let bags = engine.route(&access, T0800);
        assert_eq!(bags[0].best_arrival(), Some(T0800 + 60));
        assert!(bags[1].is_empty());
    }
}
