use chrono::NaiveDate;
use fixedbitset::FixedBitSet;

use crate::model::{
    calendar::ServiceCalendar,
    error::NetworkError,
    mode::TransitMode,
    pattern::TripPattern,
    transfers::{Transfer, TransferTable},
};

/// per-route attributes the engine consumes; the prefilter resolves each
/// pattern's mode through its route.
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub mode: TransitMode,
}

/// read-only query surface over patterns, trips, stops, services, and
/// transfers. built once by an external loader, validated here, and shared
/// unchanged across searches.
#[derive(Debug, Clone)]
pub struct TransitNetwork {
    stop_count: usize,
    patterns: Vec<TripPattern>,
    routes: Vec<RouteInfo>,
    patterns_for_stop: Vec<Vec<usize>>,
    transfers: TransferTable,
    calendar: ServiceCalendar,
    has_schedules: bool,
    has_frequencies: bool,
}

impl TransitNetwork {
    pub fn new(
        stop_count: usize,
        patterns: Vec<TripPattern>,
        routes: Vec<RouteInfo>,
        transfers: TransferTable,
        calendar: ServiceCalendar,
    ) -> Result<TransitNetwork, NetworkError> {
        validate_patterns(stop_count, &patterns, &routes, &calendar)?;
        validate_transfers(stop_count, &transfers)?;

        let mut patterns_for_stop: Vec<Vec<usize>> = vec![Vec::new(); stop_count];
        for (pattern_index, pattern) in patterns.iter().enumerate() {
            for &stop in pattern.stops.iter() {
                let visiting = &mut patterns_for_stop[stop];
                if !visiting.contains(&pattern_index) {
                    visiting.push(pattern_index);
                }
            }
        }

        let has_schedules = patterns.iter().any(|p| p.has_schedules);
        let has_frequencies = patterns.iter().any(|p| p.has_frequencies);

        log::debug!(
            "built transit network view: {} stops, {} patterns, {} routes, {} services",
            stop_count,
            patterns.len(),
            routes.len(),
            calendar.len()
        );

        Ok(TransitNetwork {
            stop_count,
            patterns,
            routes,
            patterns_for_stop,
            transfers,
            calendar,
            has_schedules,
            has_frequencies,
        })
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    pub fn patterns(&self) -> &[TripPattern] {
        &self.patterns
    }

    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    pub fn mode_of_pattern(&self, pattern: usize) -> TransitMode {
        self.routes[self.patterns[pattern].route_index].mode
    }

    pub fn patterns_for_stop(&self, stop: usize) -> &[usize] {
        &self.patterns_for_stop[stop]
    }

    pub fn transfers_for_stop(&self, stop: usize) -> &[Transfer] {
        self.transfers.for_stop(stop)
    }

    pub fn active_services_for_date(&self, date: NaiveDate) -> FixedBitSet {
        self.calendar.active_services_for_date(date)
    }

    pub fn has_schedules(&self) -> bool {
        self.has_schedules
    }

    pub fn has_frequencies(&self) -> bool {
        self.has_frequencies
    }
}

fn validate_patterns(
    stop_count: usize,
    patterns: &[TripPattern],
    routes: &[RouteInfo],
    calendar: &ServiceCalendar,
) -> Result<(), NetworkError> {
    for (pattern_index, pattern) in patterns.iter().enumerate() {
        if pattern.route_index >= routes.len() {
            return Err(NetworkError::RouteIndexOutOfBounds {
                pattern: pattern_index,
                route: pattern.route_index,
                route_count: routes.len(),
            });
        }
        if pattern.stops.is_empty() {
            return Err(NetworkError::EmptyPattern {
                pattern: pattern_index,
            });
        }
        for &stop in pattern.stops.iter() {
            if stop >= stop_count {
                return Err(NetworkError::StopIndexOutOfBounds {
                    pattern: pattern_index,
                    stop,
                    stop_count,
                });
            }
        }
        for (trip_index, trip) in pattern.trip_schedules.iter().enumerate() {
            if trip.arrivals.len() != pattern.stops.len()
                || trip.departures.len() != pattern.stops.len()
            {
                return Err(NetworkError::ScheduleLengthMismatch {
                    pattern: pattern_index,
                    trip: trip_index,
                    times: trip.arrivals.len().min(trip.departures.len()),
                    stops: pattern.stops.len(),
                });
            }
            if trip.service_code >= calendar.len() {
                return Err(NetworkError::ServiceCodeOutOfBounds {
                    pattern: pattern_index,
                    trip: trip_index,
                    service: trip.service_code,
                    service_count: calendar.len(),
                });
            }
            for entry in trip.frequency_entries.iter() {
                if entry.headway_seconds <= 0 {
                    return Err(NetworkError::InvalidHeadway {
                        pattern: pattern_index,
                        trip: trip_index,
                        headway: entry.headway_seconds,
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_transfers(stop_count: usize, transfers: &TransferTable) -> Result<(), NetworkError> {
    if transfers.stop_count() != stop_count {
        return Err(NetworkError::TransferTableSize {
            transfer_stops: transfers.stop_count(),
            stop_count,
        });
    }
    for from in 0..transfers.stop_count() {
        for transfer in transfers.for_stop(from) {
            if transfer.target_stop >= stop_count {
                return Err(NetworkError::TransferTargetOutOfBounds {
                    from,
                    target: transfer.target_stop,
                    stop_count,
                });
            }
            if transfer.target_stop == from {
                return Err(NetworkError::TransferSelfLoop { stop: from });
            }
        }
    }
    Ok(())
}
