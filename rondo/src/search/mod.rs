pub mod batch_ops;
pub mod board_search;
pub mod engine;
pub mod frequency;
pub mod frequency_offsets;
pub mod multicriteria;
pub mod path;
pub mod prefilter;
pub mod round_state;
pub mod transfer_ops;

/// travel time to a stop before it is ever reached. adding anything to this
/// overflows; check before arithmetic.
pub const UNREACHED: i32 = i32::MAX;

/// minimum slack in seconds between arriving at a stop and boarding a
/// headway-based trip there.
pub const BOARD_SLACK: i32 = 60;

/// minimum wait in seconds before boarding a scheduled trip, absorbing
/// schedule variation.
pub const MINIMUM_BOARD_WAIT: i32 = 60;

/// step in seconds between departure minutes in the search window.
pub const DEPARTURE_STEP: i32 = 60;

/// trip counts at or below this are scanned linearly when searching for a
/// boardable trip; above it a binary search brackets the scan first.
pub const TRIP_SEARCH_BINARY_THRESHOLD: usize = 46;

pub use engine::{RaptorEngine, SearchResult};
pub use multicriteria::MultiCriteriaEngine;
pub use path::{Path, PathLeg};
