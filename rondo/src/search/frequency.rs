use rondo_core::model::{FrequencyEntry, TripPattern, TripSchedule};

use crate::search::engine::SearchContext;
use crate::search::frequency_offsets::FrequencyRandomOffsets;
use crate::search::round_state::{RoundState, StopUpdate};
use crate::search::{BOARD_SLACK, UNREACHED};

/// earliest departure of a phase-shifted headway vehicle at a stop
/// position, or None when no vehicle starting within the entry window
/// departs late enough.
///
/// the vehicle start is rounded up to the first multiple of the headway, at
/// the drawn phase, not before the earliest board time; the stop's relative
/// departure is added after the rounding.
pub fn earliest_frequency_departure(
    entry: &FrequencyEntry,
    phase: i32,
    relative_departure: i32,
    earliest_board_time: i32,
) -> Option<i32> {
    let headway = entry.headway_seconds;
    let first_start = entry.start_time + phase;
    let headways_to_wait = if earliest_board_time > first_start {
        // ceiling division; both operands are positive here
        let gap = earliest_board_time - first_start;
        (gap + headway - 1) / headway
    } else {
        0
    };
    let vehicle_start = first_start + headways_to_wait * headway;
    if vehicle_start > entry.end_time {
        return None;
    }
    Some(vehicle_start + relative_departure)
}

/// one frequency round: superimposes every running frequency pattern onto
/// the scheduled upper bound using the current Monte Carlo offsets.
///
/// the input round carries no touched bits in the sub-search, and every
/// draw shifts every phase, so boarding is attempted at any stop the input
/// round reaches at all.
pub(crate) fn frequency_round(
    context: &SearchContext,
    offsets: &FrequencyRandomOffsets,
    input: &RoundState,
    output: &mut RoundState,
) {
    for &pattern_index in context.patterns.frequency.iter() {
        let pattern = &context.network.patterns()[pattern_index];
        for (trip_index, trip) in pattern.trip_schedules.iter().enumerate() {
            if !trip.is_headway_based() || !context.services_active.contains(trip.service_code) {
                continue;
            }
            for (entry_index, entry) in trip.frequency_entries.iter().enumerate() {
                let phase = offsets.offset(pattern_index, trip_index, entry_index);
                scan_entry(
                    pattern_index,
                    pattern,
                    trip_index,
                    trip,
                    entry,
                    phase,
                    input,
                    output,
                );
            }
        }
    }
}

/// walks the pattern once for one frequency entry, boarding (or backing up
/// to an earlier vehicle) where the input round reaches a stop, and
/// relaxing alight times into the output round.
#[allow(clippy::too_many_arguments)]
fn scan_entry(
    pattern_index: usize,
    pattern: &TripPattern,
    trip_index: usize,
    trip: &TripSchedule,
    entry: &FrequencyEntry,
    phase: i32,
    input: &RoundState,
    output: &mut RoundState,
) {
    let mut vehicle_start = -1i32;
    let mut board_stop = 0usize;
    let mut board_time = 0i32;
    let mut wait_time = 0i32;

    for (position, &stop) in pattern.stops.iter().enumerate() {
        // alight first so a boarding here cannot alight here too
        if vehicle_start >= 0 {
            let alight_time = vehicle_start + trip.arrivals[position];
            let in_vehicle = alight_time - board_time;
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

        if input.best_times[stop] == UNREACHED
            || input.source_pattern(stop) == pattern_index as i32
        {
            continue;
        }
        let earliest_board_time = input.best_times[stop] + BOARD_SLACK;
        if let Some(departure) =
            earliest_frequency_departure(entry, phase, trip.departures[position], earliest_board_time)
        {
            let candidate_start = departure - trip.departures[position];
            // board, or back up to an earlier vehicle reachable from a
            // later stop
            if vehicle_start < 0 || candidate_start < vehicle_start {
                vehicle_start = candidate_start;
                board_stop = stop;
                board_time = departure;
                wait_time = departure - input.best_times[stop];
            }
        }
    }
}
