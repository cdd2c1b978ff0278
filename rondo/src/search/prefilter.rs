use std::collections::HashSet;

use fixedbitset::FixedBitSet;

use rondo_core::model::{TransitMode, TransitNetwork};

/// the patterns active for one search date and mode set, partitioned into
/// scheduled and frequency subsets with bidirectional index maps between
/// original and filtered pattern ids. built once per search.
#[derive(Debug, Clone)]
pub struct FilteredPatterns {
    /// filtered scheduled index -> original pattern index
    pub scheduled: Vec<usize>,
    /// filtered frequency index -> original pattern index
    pub frequency: Vec<usize>,
    /// original pattern index -> filtered scheduled index
    pub scheduled_for_original: Vec<Option<usize>>,
    /// original pattern index -> filtered frequency index
    pub frequency_for_original: Vec<Option<usize>>,
}

/// a pattern is kept iff at least one of its service codes is active on the
/// search date and its route's mode was requested. the subsets are
/// independent: a mixed pattern appears in both.
pub fn prefilter_patterns(
    network: &TransitNetwork,
    services_active: &FixedBitSet,
    modes: &HashSet<TransitMode>,
) -> FilteredPatterns {
    let n_patterns = network.patterns().len();
    let mut filtered = FilteredPatterns {
        scheduled: Vec::new(),
        frequency: Vec::new(),
        scheduled_for_original: vec![None; n_patterns],
        frequency_for_original: vec![None; n_patterns],
    };

    for (pattern_index, pattern) in network.patterns().iter().enumerate() {
        if pattern.services_active.is_disjoint(services_active) {
            continue;
        }
        if !modes.contains(&network.mode_of_pattern(pattern_index)) {
            continue;
        }
        if pattern.has_frequencies {
            filtered.frequency_for_original[pattern_index] = Some(filtered.frequency.len());
            filtered.frequency.push(pattern_index);
        }
        if pattern.has_schedules {
            filtered.scheduled_for_original[pattern_index] = Some(filtered.scheduled.len());
            filtered.scheduled.push(pattern_index);
        }
    }

    log::info!(
        "prefiltering reduced {} patterns to {} scheduled and {} frequency for the search date",
        n_patterns,
        filtered.scheduled.len(),
        filtered.frequency.len()
    );
    filtered
}
