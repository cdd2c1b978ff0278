use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rondo_core::model::TransitNetwork;

/// one phase offset per frequency entry, redrawn at the start of every
/// Monte Carlo sub-iteration. given a seed, the sequence of draws is
/// reproducible: entries are visited in pattern, trip, entry order.
#[derive(Debug)]
pub struct FrequencyRandomOffsets {
    /// [original pattern][trip][entry] -> seconds in [0, headway)
    offsets: Vec<Vec<Vec<i32>>>,
    rng: StdRng,
}

impl FrequencyRandomOffsets {
    pub fn new(network: &TransitNetwork, seed: Option<u64>) -> FrequencyRandomOffsets {
        let offsets = network
            .patterns()
            .iter()
            .map(|pattern| {
                pattern
                    .trip_schedules
                    .iter()
                    .map(|trip| vec![0; trip.frequency_entries.len()])
                    .collect()
            })
            .collect();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        FrequencyRandomOffsets { offsets, rng }
    }

    /// draws a fresh phase for every frequency entry.
    pub fn randomize(&mut self, network: &TransitNetwork) {
        for (pattern_index, pattern) in network.patterns().iter().enumerate() {
            for (trip_index, trip) in pattern.trip_schedules.iter().enumerate() {
                for (entry_index, entry) in trip.frequency_entries.iter().enumerate() {
                    self.offsets[pattern_index][trip_index][entry_index] =
                        self.rng.gen_range(0..entry.headway_seconds);
                }
            }
        }
    }

    pub fn offset(&self, pattern: usize, trip: usize, entry: usize) -> i32 {
        self.offsets[pattern][trip][entry]
    }
}
