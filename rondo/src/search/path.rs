use crate::search::round_state::RoundState;
use crate::search::UNREACHED;

/// one segment of a reconstructed journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLeg {
    /// ride a vehicle between two stops of a pattern; `wait_time` is the
    /// wait at the board stop before departure
    Ride {
        pattern: usize,
        trip: usize,
        board_stop: usize,
        alight_stop: usize,
        board_time: i32,
        alight_time: i32,
        wait_time: i32,
    },
    /// walk a transfer edge between two stops
    Transfer {
        from_stop: usize,
        to_stop: usize,
        duration: i32,
    },
}

impl PathLeg {
    pub fn duration(&self) -> i32 {
        match self {
            PathLeg::Ride {
                board_time,
                alight_time,
                wait_time,
                ..
            } => wait_time + (alight_time - board_time),
            PathLeg::Transfer { duration, .. } => *duration,
        }
    }
}

/// a journey from the origin to one stop, rebuilt from round provenance.
/// the access walk enters the network at `access_stop`; leg durations plus
/// the access walk sum to the stop's travel time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub access_stop: usize,
    /// seconds of initial walking from the origin
    pub access_duration: i32,
    pub legs: Vec<PathLeg>,
}

impl Path {
    pub fn total_duration(&self) -> i32 {
        self.access_duration + self.legs.iter().map(PathLeg::duration).sum::<i32>()
    }

    pub fn num_rides(&self) -> usize {
        self.legs
            .iter()
            .filter(|leg| matches!(leg, PathLeg::Ride { .. }))
            .count()
    }

    /// walks provenance from `round` backward: an optimal transfer is
    /// followed within its round, then the ride that reached the transfer
    /// source moves to the previous round. the walk ends at round 0 (the
    /// access state) or where provenance runs out.
    pub fn to_stop(states: &[RoundState], round: usize, stop: usize) -> Option<Path> {
        if states[round].best_non_transfer_times[stop] == UNREACHED {
            return None;
        }

        let mut legs: Vec<PathLeg> = Vec::new();
        let mut current_round = round;
        let mut current_stop = stop;

        while current_round > 0 {
            let state = &states[current_round];
            let mut ride_stop = current_stop;
            if state.transfer_stops[current_stop] != -1 {
                let from_stop = state.transfer_stops[current_stop] as usize;
                legs.push(PathLeg::Transfer {
                    from_stop,
                    to_stop: current_stop,
                    duration: state.transfer_times[current_stop],
                });
                ride_stop = from_stop;
            }
            if state.previous_patterns[ride_stop] == -1 {
                // reached without riding this round (inherited from a
                // fewer-ride solution); the chain ends here
                current_stop = ride_stop;
                break;
            }
            let board_stop = state.previous_stops[ride_stop] as usize;
            legs.push(PathLeg::Ride {
                pattern: state.previous_patterns[ride_stop] as usize,
                trip: state.previous_trips[ride_stop] as usize,
                board_stop,
                alight_stop: ride_stop,
                board_time: state.board_times[ride_stop],
                alight_time: state.best_non_transfer_times[ride_stop],
                wait_time: state.board_times[ride_stop]
                    - states[current_round - 1].best_times[board_stop],
            });
            current_stop = board_stop;
            current_round -= 1;
        }

        let access_arrival = states[0].best_times[current_stop];
        if access_arrival == UNREACHED {
            return None;
        }
        legs.reverse();
        Some(Path {
            access_stop: current_stop,
            access_duration: access_arrival - states[0].departure_time,
            legs,
        })
    }
}

/// paths for every stop the final round reaches by vehicle.
pub fn paths_to_each_stop(states: &[RoundState], final_round: usize) -> Vec<Option<Path>> {
    (0..states[final_round].stop_count())
        .map(|stop| Path::to_stop(states, final_round, stop))
        .collect()
}

#[cfg(test)]
mod test {
    use super::{Path, PathLeg};
    use crate::search::round_state::{RoundState, StopUpdate};

    const DEPARTURE: i32 = 28800;

    fn round(stop_count: usize) -> RoundState {
        let mut state = RoundState::new(stop_count, 7200);
        state.set_departure_time(DEPARTURE);
        state
    }

    /// access at stop 0, ride pattern 0 to stop 1, transfer to stop 2,
    /// ride pattern 1 to stop 3.
    fn two_round_states() -> Vec<RoundState> {
        let mut round0 = round(4);
        round0.set_time_at_stop(0, StopUpdate::access(28860), None);

        let mut round1 = round(4);
        round1.min(&round0);
        round1.set_time_at_stop(1, StopUpdate::ride(29700, 0, 0, 240, 600, 0, 29100), None);
        round1.set_time_at_stop(2, StopUpdate::transfer(29820, 1, 120), None);

        let mut round2 = round(4);
        round2.min(&round1);
        // the ride into stop 3 boards at the transfer target
        round2.set_time_at_stop(
            3,
            StopUpdate::ride(30600, 1, 2, 180, 600, 0, 30000),
            Some(&round1),
        );

        vec![round0, round1, round2]
    }

    #[test]
    fn test_ride_transfer_ride_chain() {
        let states = two_round_states();
        let path = Path::to_stop(&states, 2, 3).expect("stop 3 has a path");

        assert_eq!(path.access_stop, 0);
        assert_eq!(path.access_duration, 60);
        assert_eq!(path.num_rides(), 2);
        assert_eq!(path.legs.len(), 3);
        assert!(matches!(path.legs[0], PathLeg::Ride { pattern: 0, .. }));
        assert!(matches!(
            path.legs[1],
            PathLeg::Transfer {
                from_stop: 1,
                to_stop: 2,
                duration: 120
            }
        ));
        assert!(matches!(path.legs[2], PathLeg::Ride { pattern: 1, .. }));

        // leg durations telescope to the final arrival
        assert_eq!(
            path.total_duration(),
            states[2].best_non_transfer_times[3] - DEPARTURE
        );
    }

    #[test]
    fn test_unreached_stop_has_no_path() {
        let states = two_round_states();
        assert!(Path::to_stop(&states, 2, 2).is_none(), "transfer-only stop");
        assert!(
            Path::to_stop(&states, 1, 3).is_none(),
            "not yet reached in round 1"
        );
    }

    #[test]
    fn test_inherited_solution_ends_chain_early() {
        // round 2 inherits stop 1 from round 1 without riding again
        let states = two_round_states();
        let path = Path::to_stop(&states, 2, 1).expect("stop 1 has a path");
        assert_eq!(path.num_rides(), 1);
        assert_eq!(path.total_duration(), 29700 - DEPARTURE);
    }
}
