//! rondo: a round-based public transit (RAPTOR) routing engine.
//!
//! given a transit network view, an origin access table, and a window of
//! candidate departure times, the engine computes the minimum travel time to
//! every transit stop, amortizing work across departure minutes with
//! range-RAPTOR and drawing randomized phases for headway-based services so
//! results reflect the distribution of possible arrivals.

pub mod model;
pub mod search;
