#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("pattern {pattern} references route {route} but only {route_count} routes exist")]
    RouteIndexOutOfBounds {
        pattern: usize,
        route: usize,
        route_count: usize,
    },
    #[error("pattern {pattern} has no stops")]
    EmptyPattern { pattern: usize },
    #[error("pattern {pattern} references stop {stop} but only {stop_count} stops exist")]
    StopIndexOutOfBounds {
        pattern: usize,
        stop: usize,
        stop_count: usize,
    },
    #[error("trip {trip} on pattern {pattern} has {times} stop times for {stops} stops")]
    ScheduleLengthMismatch {
        pattern: usize,
        trip: usize,
        times: usize,
        stops: usize,
    },
    #[error(
        "trip {trip} on pattern {pattern} references service {service} but only {service_count} services exist"
    )]
    ServiceCodeOutOfBounds {
        pattern: usize,
        trip: usize,
        service: usize,
        service_count: usize,
    },
    #[error("headway entry on trip {trip} of pattern {pattern} has non-positive headway {headway}")]
    InvalidHeadway {
        pattern: usize,
        trip: usize,
        headway: i32,
    },
    #[error("transfer table covers {transfer_stops} stops but the network has {stop_count}")]
    TransferTableSize {
        transfer_stops: usize,
        stop_count: usize,
    },
    #[error("transfer from stop {from} targets stop {target} but only {stop_count} stops exist")]
    TransferTargetOutOfBounds {
        from: usize,
        target: usize,
        stop_count: usize,
    },
    #[error("transfer from stop {stop} to itself")]
    TransferSelfLoop { stop: usize },
    #[error("packed transfer list for stop {stop} has odd length {len}")]
    MalformedPackedTransfers { stop: usize, len: usize },
}
