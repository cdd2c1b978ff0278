use crate::search::round_state::{RoundState, StopUpdate};
use rondo_core::model::TransitNetwork;

/// walks transfer edges out of every stop the current round reached by
/// vehicle. transfers do not form their own round: they extend the round in
/// which the vehicle arrived, and only vehicle arrivals seed them, so
/// transfer legs cannot chain past the walk limit.
pub fn relax_transfers(
    network: &TransitNetwork,
    walk_speed_millimeters_per_second: i32,
    max_walk_millimeters: i32,
    state: &mut RoundState,
) {
    // transfer arrivals only mark the best-time bitsets, so the vehicle
    // bitset can be moved out for the scan and restored unchanged
    let touched = std::mem::take(&mut state.non_transfer_stops_touched);
    for stop in touched.ones() {
        for transfer in network.transfers_for_stop(stop) {
            if transfer.distance_millimeters < max_walk_millimeters {
                let walk_seconds =
                    transfer.distance_millimeters / walk_speed_millimeters_per_second;
                if walk_seconds < 0 {
                    log::error!(
                        "negative transfer time from stop {} to stop {}",
                        stop,
                        transfer.target_stop
                    );
                }
                let time = state.best_non_transfer_times[stop] + walk_seconds;
                state.set_time_at_stop(
                    transfer.target_stop,
                    StopUpdate::transfer(time, stop, walk_seconds),
                    None,
                );
            }
        }
    }
    state.non_transfer_stops_touched = touched;
}
