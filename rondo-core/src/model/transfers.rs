use crate::model::error::NetworkError;

/// a directed walk edge between two stops, produced by an external street
/// search. self-loops are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub target_stop: usize,
    pub distance_millimeters: i32,
}

/// per-stop transfer lists.
#[derive(Debug, Clone, Default)]
pub struct TransferTable {
    transfers_for_stop: Vec<Vec<Transfer>>,
}

impl TransferTable {
    pub fn new(stop_count: usize) -> TransferTable {
        TransferTable {
            transfers_for_stop: vec![Vec::new(); stop_count],
        }
    }

    pub fn add(&mut self, from_stop: usize, transfer: Transfer) {
        self.transfers_for_stop[from_stop].push(transfer);
    }

    /// builds the table from the packed encoding used at the loader
    /// boundary: for each stop, a flat list of `(target, distance)` pairs.
    pub fn from_packed(packed: &[Vec<i32>]) -> Result<TransferTable, NetworkError> {
        let mut table = TransferTable::new(packed.len());
        for (stop, pairs) in packed.iter().enumerate() {
            if pairs.len() % 2 != 0 {
                return Err(NetworkError::MalformedPackedTransfers {
                    stop,
                    len: pairs.len(),
                });
            }
            for pair in pairs.chunks_exact(2) {
                table.add(
                    stop,
                    Transfer {
                        target_stop: pair[0] as usize,
                        distance_millimeters: pair[1],
                    },
                );
            }
        }
        Ok(table)
    }

    pub fn for_stop(&self, stop: usize) -> &[Transfer] {
        self.transfers_for_stop
            .get(stop)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stop_count(&self) -> usize {
        self.transfers_for_stop.len()
    }
}

#[cfg(test)]
mod test {
    use super::{Transfer, TransferTable};

    #[test]
    fn test_from_packed() {
        let packed = vec![vec![1, 156_000, 2, 80_000], vec![], vec![0, 80_000]];
        let table = TransferTable::from_packed(&packed).expect("packed pairs should parse");

        assert_eq!(table.stop_count(), 3);
        assert_eq!(
            table.for_stop(0),
            &[
                Transfer {
                    target_stop: 1,
                    distance_millimeters: 156_000
                },
                Transfer {
                    target_stop: 2,
                    distance_millimeters: 80_000
                },
            ]
        );
        assert!(table.for_stop(1).is_empty());
        assert!(table.for_stop(99).is_empty(), "out of range reads as empty");
    }

    #[test]
    fn test_from_packed_odd_length() {
        let packed = vec![vec![1, 156_000, 2]];
        assert!(TransferTable::from_packed(&packed).is_err());
    }
}
