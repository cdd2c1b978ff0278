use fixedbitset::FixedBitSet;

use rondo_core::model::{AccessTable, TransitNetwork};

use crate::model::{error::SearchError, request::SearchRequest};
use crate::search::{
    board_search::TripBoardSearch,
    frequency::frequency_round,
    frequency_offsets::FrequencyRandomOffsets,
    path::{paths_to_each_stop, Path},
    prefilter::{prefilter_patterns, FilteredPatterns},
    round_state::{RoundState, StopUpdate},
    transfer_ops::relax_transfers,
    DEPARTURE_STEP, MINIMUM_BOARD_WAIT, UNREACHED,
};

/// travel times (and optionally paths) for every search iteration, ordered
/// latest departure minute first, then by Monte Carlo draw. callers wanting
/// earliest-first must reverse.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// [iteration][stop] travel time in seconds, or UNREACHED
    pub travel_times: Vec<Box<[i32]>>,
    /// per iteration, per stop: the boarding chain, when retained
    pub paths: Option<Vec<Vec<Option<Path>>>>,
    pub n_minutes: u32,
    pub draws_per_minute: u32,
}

impl SearchResult {
    pub fn iterations(&self) -> usize {
        self.travel_times.len()
    }
}

/// the immutable pieces of one search, shared by the round routines.
pub(crate) struct SearchContext<'a> {
    pub network: &'a TransitNetwork,
    pub request: &'a SearchRequest,
    pub services_active: FixedBitSet,
    pub patterns: FilteredPatterns,
    pub walk_speed_millimeters_per_second: i32,
    pub max_walk_millimeters: i32,
}

/// arrival vectors produced for one departure minute, one per Monte Carlo
/// draw.
struct MinuteIteration {
    arrivals: Box<[i32]>,
    paths: Option<Vec<Option<Path>>>,
}

/// range-RAPTOR search engine. the outer loop steps backward over the
/// departure window one minute at a time, reusing the later minute's
/// arrivals as an upper bound; rides cannot get slower by leaving earlier,
/// so the reuse only prunes. each minute runs rounds of scheduled
/// exploration and transfer relaxation, then Monte Carlo sub-iterations
/// overlay headway-based services with freshly drawn phases.
pub struct RaptorEngine<'a> {
    context: SearchContext<'a>,
    access: &'a AccessTable,
    states: Vec<RoundState>,
    offsets: FrequencyRandomOffsets,
    n_minutes: u32,
}

impl<'a> RaptorEngine<'a> {
    pub fn new(
        network: &'a TransitNetwork,
        request: &'a SearchRequest,
        access: &'a AccessTable,
    ) -> Result<RaptorEngine<'a>, SearchError> {
        request.validate()?;
        let services_active = network.active_services_for_date(request.date);
        let patterns = prefilter_patterns(network, &services_active, &request.transit_modes);

        // one state per round, plus round 0 for the initial walk
        let max_duration = request.max_trip_duration_seconds();
        let states = (0..=request.max_rides)
            .map(|_| RoundState::new(network.stop_count(), max_duration))
            .collect();

        Ok(RaptorEngine {
            context: SearchContext {
                network,
                request,
                services_active,
                patterns,
                walk_speed_millimeters_per_second: request.walk_speed_millimeters_per_second(),
                max_walk_millimeters: request.max_walk_millimeters(),
            },
            access,
            states,
            offsets: FrequencyRandomOffsets::new(network, request.monte_carlo_seed),
            n_minutes: request.time_window_minutes(),
        })
    }

    /// runs the whole departure window and returns one travel-time vector
    /// per iteration.
    pub fn route(&mut self) -> SearchResult {
        let request = self.context.request;
        let draws = request.monte_carlo_draws_per_minute;
        log::info!(
            "performing {} scheduled iterations each with {} monte carlo draws for a total of {} iterations",
            self.n_minutes,
            draws,
            self.n_minutes * draws
        );

        let mut travel_times: Vec<Box<[i32]>> =
            Vec::with_capacity((self.n_minutes * draws) as usize);
        let mut paths_per_iteration: Vec<Vec<Option<Path>>> = Vec::new();

        let mut departure_time = request.to_time - DEPARTURE_STEP;
        let mut minute = self.n_minutes;
        while departure_time >= request.from_time {
            if minute % 15 == 0 {
                log::debug!("  minute {minute}");
            }
            for iteration in self.run_raptor_for_minute(departure_time) {
                travel_times.push(to_travel_times(&iteration.arrivals, departure_time));
                if let Some(paths) = iteration.paths {
                    paths_per_iteration.push(paths);
                }
            }
            departure_time -= DEPARTURE_STEP;
            minute -= 1;
        }

        log::info!(
            "search complete: {} iterations over {} departure minutes",
            travel_times.len(),
            self.n_minutes
        );
        SearchResult {
            travel_times,
            paths: request.retain_paths.then_some(paths_per_iteration),
            n_minutes: self.n_minutes,
            draws_per_minute: draws,
        }
    }

    /// prepares the retained round states for the next-earlier departure
    /// minute and seeds round 0 from the access table.
    fn advance_to_previous_minute(&mut self, departure_time: i32) {
        for state in self.states.iter_mut() {
            state.set_departure_time(departure_time);
            state.clear_touched();
        }
        let initial = &mut self.states[0];
        for (stop, access_seconds) in self.access.iter() {
            initial.set_time_at_stop(
                stop,
                StopUpdate::access(access_seconds + departure_time),
                None,
            );
        }
    }

    /// one departure minute: the scheduled rounds, then one sub-search per
    /// Monte Carlo draw when frequency patterns exist.
    fn run_raptor_for_minute(&mut self, departure_time: i32) -> Vec<MinuteIteration> {
        self.advance_to_previous_minute(departure_time);
        let max_rides = self.context.request.max_rides as usize;

        if self.context.network.has_schedules() {
            for round in 1..=max_rides {
                let (before, after) = self.states.split_at_mut(round);
                let input = &before[round - 1];
                let output = &mut after[0];
                // inherit fewer-ride solutions before exploring
                output.min(input);
                scheduled_round(&self.context, input, output);
                relax_transfers(
                    self.context.network,
                    self.context.walk_speed_millimeters_per_second,
                    self.context.max_walk_millimeters,
                    output,
                );
            }
        }

        let draws = self.context.request.monte_carlo_draws_per_minute as usize;
        let retain = self.context.request.retain_paths;
        let mut iterations = Vec::with_capacity(draws);

        if self.context.patterns.frequency.is_empty() {
            // repeat the scheduled result once per requested draw so the
            // iteration count downstream is stable
            let arrivals: Box<[i32]> = emitted(&self.states, max_rides).into();
            let paths = retain.then(|| paths_to_each_stop(&self.states, max_rides));
            for _ in 0..draws {
                iterations.push(MinuteIteration {
                    arrivals: arrivals.clone(),
                    paths: paths.clone(),
                });
            }
        } else {
            for _ in 0..draws {
                self.offsets.randomize(self.context.network);
                let mut draw_states: Vec<RoundState> =
                    self.states.iter().map(RoundState::copy_for_draw).collect();
                for round in 1..=max_rides {
                    let (before, after) = draw_states.split_at_mut(round);
                    let input = &before[round - 1];
                    let output = &mut after[0];
                    output.min(input);
                    frequency_round(&self.context, &self.offsets, input, output);
                    scheduled_round(&self.context, input, output);
                    relax_transfers(
                        self.context.network,
                        self.context.walk_speed_millimeters_per_second,
                        self.context.max_walk_millimeters,
                        output,
                    );
                }
                let arrivals: Box<[i32]> = emitted(&draw_states, max_rides).into();
                let paths = retain.then(|| paths_to_each_stop(&draw_states, max_rides));
                iterations.push(MinuteIteration { arrivals, paths });
            }
        }
        iterations
    }
}

/// the vector a minute emits: vehicle arrivals for the final round, or the
/// access-walk state when no rides are allowed.
fn emitted(states: &[RoundState], final_round: usize) -> &[i32] {
    let state = &states[final_round];
    if final_round == 0 {
        &state.best_times
    } else {
        &state.best_non_transfer_times
    }
}

fn to_travel_times(arrivals: &[i32], departure_time: i32) -> Box<[i32]> {
    arrivals
        .iter()
        .map(|&arrival| {
            if arrival == UNREACHED {
                UNREACHED
            } else {
                arrival - departure_time
            }
        })
        .collect()
}

/// one scheduled RAPTOR round: scan every pattern touched by the input
/// round, maintaining the current trip along each pattern; alight into the
/// output round, board at touched stops, and back up to earlier trips where
/// a touched stop allows it.
pub(crate) fn scheduled_round(context: &SearchContext, input: &RoundState, output: &mut RoundState) {
    let patterns_touched = patterns_touched_for_stops(
        context,
        input,
        &context.patterns.scheduled_for_original,
        context.patterns.scheduled.len(),
    );

    for filtered_index in patterns_touched.ones() {
        let pattern_index = context.patterns.scheduled[filtered_index];
        let pattern = &context.network.patterns()[pattern_index];
        let board_search = TripBoardSearch::new(pattern, &context.services_active);
        let n_trips = pattern.trip_schedules.len();

        let mut on_trip: Option<usize> = None;
        let mut board_time = 0i32;
        let mut board_stop = 0usize;
        let mut wait_time = 0i32;

        for (position, &stop) in pattern.stops.iter().enumerate() {
            // alight first so a boarding at this stop cannot alight here too
            if let Some(trip_index) = on_trip {
                let schedule = &pattern.trip_schedules[trip_index];
                let alight_time = schedule.arrivals[position];
                let in_vehicle = alight_time - board_time;
                if wait_time + in_vehicle + input.best_times[board_stop] > alight_time {
                    log::error!("components of travel time are larger than total travel time");
                }
                output.set_time_at_stop(
                    stop,
                    StopUpdate::ride(
                        alight_time,
                        pattern_index,
                        board_stop,
                        wait_time,
                        in_vehicle,
                        trip_index,
                        board_time,
                    ),
                    Some(input),
                );
            }

            // board only at stops the input round touched, and never the
            // pattern the stop was reached by
            if !input.best_stops_touched.contains(stop)
                || input.source_pattern(stop) == pattern_index as i32
            {
                continue;
            }
            let earliest_board_time = input.best_times[stop] + MINIMUM_BOARD_WAIT;
            let upper_bound = match on_trip {
                None => n_trips,
                Some(trip_index) => trip_index,
            };
            if let Some(found) = board_search.search(upper_bound, earliest_board_time, position) {
                let schedule = &pattern.trip_schedules[found];
                on_trip = Some(found);
                board_time = schedule.departures[position];
                wait_time = board_time - input.best_times[stop];
                board_stop = stop;
            }
        }
    }
}

/// the filtered indices of patterns visiting any stop the given round
/// touched, excluding for each stop the pattern it was reached by.
fn patterns_touched_for_stops(
    context: &SearchContext,
    state: &RoundState,
    filtered_for_original: &[Option<usize>],
    filtered_len: usize,
) -> FixedBitSet {
    let mut touched = FixedBitSet::with_capacity(filtered_len);
    for stop in state.best_stops_touched.ones() {
        for &original in context.network.patterns_for_stop(stop) {
            let Some(filtered) = filtered_for_original[original] else {
                continue;
            };
            if state.source_pattern(stop) != original as i32 {
                touched.insert(filtered);
            }
        }
    }
    touched
}
