use fixedbitset::FixedBitSet;

use crate::search::UNREACHED;

/// one candidate update to a stop's arrival state. built through the
/// `ride`, `transfer`, and `access` constructors; provenance indices use
/// `-1` for absent.
#[derive(Debug, Clone, Copy)]
pub struct StopUpdate {
    pub time: i32,
    pub from_pattern: i32,
    pub from_stop: i32,
    pub wait_time: i32,
    pub in_vehicle_time: i32,
    pub transfer: bool,
    pub trip_index: i32,
    pub board_time: i32,
    pub transfer_time: i32,
}

impl StopUpdate {
    /// arrival by alighting from a vehicle.
    pub fn ride(
        time: i32,
        pattern: usize,
        from_stop: usize,
        wait_time: i32,
        in_vehicle_time: i32,
        trip_index: usize,
        board_time: i32,
    ) -> StopUpdate {
        StopUpdate {
            time,
            from_pattern: pattern as i32,
            from_stop: from_stop as i32,
            wait_time,
            in_vehicle_time,
            transfer: false,
            trip_index: trip_index as i32,
            board_time,
            transfer_time: -1,
        }
    }

    /// arrival by walking a transfer edge from a vehicle-reached stop.
    pub fn transfer(time: i32, from_stop: usize, transfer_time: i32) -> StopUpdate {
        StopUpdate {
            time,
            from_pattern: -1,
            from_stop: from_stop as i32,
            wait_time: 0,
            in_vehicle_time: 0,
            transfer: true,
            trip_index: -1,
            board_time: -1,
            transfer_time,
        }
    }

    /// arrival by the initial access walk from the origin.
    pub fn access(time: i32) -> StopUpdate {
        StopUpdate {
            time,
            from_pattern: -1,
            from_stop: -1,
            wait_time: 0,
            in_vehicle_time: 0,
            transfer: true,
            trip_index: -1,
            board_time: -1,
            transfer_time: -1,
        }
    }
}

/// arrival state for one RAPTOR round: the best clock time at every stop
/// through this round, the best time reached by alighting from a vehicle,
/// and the provenance needed to rebuild boarding chains.
///
/// rounds live in an index-ordered array per search; the parent round (one
/// fewer ride) is passed by reference to the operations that consult it.
/// between departure minutes the value arrays are deliberately not reset —
/// range-RAPTOR reuses the later minute's arrivals as an upper bound — while
/// the touched bitsets are cleared at every minute boundary.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub departure_time: i32,
    has_departure: bool,
    max_duration_seconds: i32,
    /// best arrival via transit or transfer
    pub best_times: Box<[i32]>,
    /// best arrival by alighting from a vehicle; never via a transfer, so
    /// stringing transfers together cannot blow past the walk limit
    pub best_non_transfer_times: Box<[i32]>,
    pub previous_patterns: Box<[i32]>,
    pub previous_trips: Box<[i32]>,
    pub previous_stops: Box<[i32]>,
    pub board_times: Box<[i32]>,
    /// the stop transferred from when `best_times` came by transfer, else -1
    pub transfer_stops: Box<[i32]>,
    pub transfer_times: Box<[i32]>,
    non_transfer_wait_time: Box<[i32]>,
    non_transfer_in_vehicle_time: Box<[i32]>,
    wait_time_adjustment: i32,
    /// stops whose best time changed this round (transit or transfer)
    pub best_stops_touched: FixedBitSet,
    /// stops reached by alighting this round
    pub non_transfer_stops_touched: FixedBitSet,
    pub stop_times_improved: FixedBitSet,
}

impl RoundState {
    pub fn new(stop_count: usize, max_duration_seconds: i32) -> RoundState {
        RoundState {
            departure_time: 0,
            has_departure: false,
            max_duration_seconds,
            best_times: vec![UNREACHED; stop_count].into_boxed_slice(),
            best_non_transfer_times: vec![UNREACHED; stop_count].into_boxed_slice(),
            previous_patterns: vec![-1; stop_count].into_boxed_slice(),
            previous_trips: vec![-1; stop_count].into_boxed_slice(),
            previous_stops: vec![-1; stop_count].into_boxed_slice(),
            board_times: vec![-1; stop_count].into_boxed_slice(),
            transfer_stops: vec![-1; stop_count].into_boxed_slice(),
            transfer_times: vec![-1; stop_count].into_boxed_slice(),
            non_transfer_wait_time: vec![0; stop_count].into_boxed_slice(),
            non_transfer_in_vehicle_time: vec![0; stop_count].into_boxed_slice(),
            wait_time_adjustment: 0,
            best_stops_touched: FixedBitSet::with_capacity(stop_count),
            non_transfer_stops_touched: FixedBitSet::with_capacity(stop_count),
            stop_times_improved: FixedBitSet::with_capacity(stop_count),
        }
    }

    pub fn stop_count(&self) -> usize {
        self.best_times.len()
    }

    /// records the departure minute and the offset correcting wait times
    /// retained from the previously searched (later) minute. the first
    /// minute has no pre-stored wait times to correct.
    pub fn set_departure_time(&mut self, departure_time: i32) {
        self.wait_time_adjustment = if self.has_departure {
            self.departure_time - departure_time
        } else {
            0
        };
        self.has_departure = true;
        self.departure_time = departure_time;
    }

    pub fn clear_touched(&mut self) {
        self.best_stops_touched.clear();
        self.non_transfer_stops_touched.clear();
        self.stop_times_improved.clear();
    }

    /// unconditionally seeds a stop time, marking the stop touched.
    pub fn set_initial_time(&mut self, stop: usize, time: i32) {
        self.stop_times_improved.insert(stop);
        self.best_times[stop] = time;
        self.best_stops_touched.insert(stop);
    }

    /// applies `update` to `stop` iff it improves the recorded state,
    /// copying provenance and accumulating wait and in-vehicle components
    /// from `previous`, the parent round. arrivals past the trip duration
    /// cap are rejected. returns true if either vector improved.
    pub fn set_time_at_stop(
        &mut self,
        stop: usize,
        update: StopUpdate,
        previous: Option<&RoundState>,
    ) -> bool {
        if update.time > self.departure_time + self.max_duration_seconds {
            return false;
        }

        let mut optimal = false;
        if !update.transfer && update.time < self.best_non_transfer_times[stop] {
            self.stop_times_improved.insert(stop);
            self.best_non_transfer_times[stop] = update.time;
            self.non_transfer_stops_touched.insert(stop);
            self.previous_patterns[stop] = update.from_pattern;
            self.previous_trips[stop] = update.trip_index;
            self.board_times[stop] = update.board_time;
            self.previous_stops[stop] = update.from_stop;

            let (total_wait, total_in_vehicle) = match previous {
                // first round: no accumulated components
                None => (update.wait_time, update.in_vehicle_time),
                Some(prev) => {
                    let from_stop = update.from_stop as usize;
                    // wait time is not stored on transfer arrivals; when the
                    // board stop was optimally reached by transfer, follow it
                    // back to the stop the vehicle actually reached
                    let provenance_stop = if prev.transfer_stops[from_stop] != -1 {
                        prev.transfer_stops[from_stop] as usize
                    } else {
                        from_stop
                    };
                    (
                        prev.non_transfer_wait_time[provenance_stop] + update.wait_time,
                        prev.non_transfer_in_vehicle_time[provenance_stop] + update.in_vehicle_time,
                    )
                }
            };
            if total_in_vehicle + total_wait > update.time - self.departure_time {
                log::error!("wait and travel time greater than total time");
            }
            self.non_transfer_wait_time[stop] = total_wait;
            self.non_transfer_in_vehicle_time[stop] = total_in_vehicle;
            optimal = true;
        }

        if update.time < self.best_times[stop] {
            self.stop_times_improved.insert(stop);
            self.best_times[stop] = update.time;
            self.best_stops_touched.insert(stop);
            if update.transfer {
                self.transfer_stops[stop] = update.from_stop;
                self.transfer_times[stop] = update.transfer_time;
            } else {
                self.transfer_stops[stop] = -1;
            }
            optimal = true;
        }

        optimal
    }

    /// componentwise minimum with `other` (range-RAPTOR inheritance).
    /// prefers `other` on ties: it is earlier in the round sequence and so
    /// holds fewer-ride solutions.
    pub fn min(&mut self, other: &RoundState) {
        for stop in other.stop_times_improved.ones() {
            if other.best_times[stop] <= self.best_times[stop] {
                self.stop_times_improved.insert(stop);
                self.best_times[stop] = other.best_times[stop];
                self.transfer_stops[stop] = other.transfer_stops[stop];
                self.transfer_times[stop] = other.transfer_times[stop];
            }
            if other.best_non_transfer_times[stop] <= self.best_non_transfer_times[stop] {
                self.stop_times_improved.insert(stop);
                self.best_non_transfer_times[stop] = other.best_non_transfer_times[stop];
                self.previous_patterns[stop] = other.previous_patterns[stop];
                self.previous_trips[stop] = other.previous_trips[stop];
                self.previous_stops[stop] = other.previous_stops[stop];
                self.board_times[stop] = other.board_times[stop];
                self.non_transfer_in_vehicle_time[stop] =
                    other.non_transfer_in_vehicle_time[stop];
                // carry any extra wait introduced by departing earlier
                self.non_transfer_wait_time[stop] = other.non_transfer_wait_time[stop]
                    + (other.departure_time - self.departure_time);
            }
        }
    }

    /// copy for a Monte Carlo sub-search: value arrays cloned, touched
    /// bitsets left empty.
    pub fn copy_for_draw(&self) -> RoundState {
        let mut copy = self.clone();
        copy.clear_touched();
        copy
    }

    /// the pattern used to reach `stop`, looking through an optimal
    /// transfer to the stop the vehicle actually reached. used to forbid
    /// immediately re-riding the pattern a stop was reached by.
    pub fn source_pattern(&self, stop: usize) -> i32 {
        if self.transfer_stops[stop] != -1 {
            self.previous_patterns[self.transfer_stops[stop] as usize]
        } else {
            self.previous_patterns[stop]
        }
    }

    /// cumulative wait component of the best transit arrival, corrected to
    /// this round's departure minute.
    pub fn non_transfer_wait_time(&self, stop: usize) -> i32 {
        self.non_transfer_wait_time[stop] + self.wait_time_adjustment
    }

    /// cumulative in-vehicle component of the best transit arrival.
    pub fn non_transfer_in_vehicle_time(&self, stop: usize) -> i32 {
        self.non_transfer_in_vehicle_time[stop]
    }
}
