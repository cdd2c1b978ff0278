use std::collections::BTreeMap;

/// walking seconds from the search origin to each initially reachable stop.
/// iteration order is deterministic, and duplicate inserts keep the faster
/// time.
#[derive(Debug, Clone, Default)]
pub struct AccessTable {
    times: BTreeMap<usize, i32>,
}

impl AccessTable {
    pub fn new() -> AccessTable {
        AccessTable::default()
    }

    pub fn set(&mut self, stop: usize, seconds: i32) {
        self.times
            .entry(stop)
            .and_modify(|kept| *kept = (*kept).min(seconds))
            .or_insert(seconds);
    }

    pub fn get(&self, stop: usize) -> Option<i32> {
        self.times.get(&stop).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.times.iter().map(|(stop, seconds)| (*stop, *seconds))
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl FromIterator<(usize, i32)> for AccessTable {
    fn from_iter<I: IntoIterator<Item = (usize, i32)>>(iter: I) -> AccessTable {
        let mut table = AccessTable::new();
        for (stop, seconds) in iter {
            table.set(stop, seconds);
        }
        table
    }
}

#[cfg(test)]
mod test {
    use super::AccessTable;

    #[test]
    fn test_duplicate_insert_keeps_minimum() {
        let mut table = AccessTable::new();
        table.set(4, 300);
        table.set(4, 120);
        table.set(4, 500);
        assert_eq!(table.get(4), Some(120));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_deterministic_iteration_order() {
        let table: AccessTable = vec![(9, 60), (2, 45), (5, 90)].into_iter().collect();
        let stops: Vec<usize> = table.iter().map(|(stop, _)| stop).collect();
        assert_eq!(stops, vec![2, 5, 9]);
    }
}
