//! data model for the rondo transit routing engine: a read-only view over
//! stops, trip patterns, schedules, services, transfers, and origin access
//! times, built once by an external loader and shared across searches.

pub mod model;
