/// one Pareto-optimal way of reaching a stop. the criteria vector is
/// (arrival time, rides, total wait, total in-vehicle); the remaining
/// fields are provenance and do not enter dominance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McLabel {
    pub arrival_time: i32,
    /// number of boardings used
    pub rounds: u32,
    pub total_wait: i32,
    pub total_in_vehicle: i32,
    /// pattern of the last ride, -1 before any ride
    pub board_pattern: i32,
    /// stop the last ride boarded at, -1 before any ride
    pub board_stop: i32,
    /// true when this arrival came by walking a transfer edge
    pub transferred: bool,
}

impl McLabel {
    pub fn access(arrival_time: i32) -> McLabel {
        McLabel {
            arrival_time,
            rounds: 0,
            total_wait: 0,
            total_in_vehicle: 0,
            board_pattern: -1,
            board_stop: -1,
            transferred: false,
        }
    }

    /// true when self is at least as good on every criterion and strictly
    /// better on at least one.
    pub fn dominates(&self, other: &McLabel) -> bool {
        self.arrival_time <= other.arrival_time
            && self.rounds <= other.rounds
            && self.total_wait <= other.total_wait
            && self.total_in_vehicle <= other.total_in_vehicle
            && (self.arrival_time < other.arrival_time
                || self.rounds < other.rounds
                || self.total_wait < other.total_wait
                || self.total_in_vehicle < other.total_in_vehicle)
    }

    fn same_criteria(&self, other: &McLabel) -> bool {
        self.arrival_time == other.arrival_time
            && self.rounds == other.rounds
            && self.total_wait == other.total_wait
            && self.total_in_vehicle == other.total_in_vehicle
    }
}

/// the Pareto set of labels for one stop. insertion rejects dominated and
/// duplicate labels and prunes everything the new label dominates.
#[derive(Debug, Clone, Default)]
pub struct ParetoBag {
    labels: Vec<McLabel>,
}

impl ParetoBag {
    pub fn insert(&mut self, label: McLabel) -> bool {
        if self
            .labels
            .iter()
            .any(|kept| kept.dominates(&label) || kept.same_criteria(&label))
        {
            return false;
        }
        self.labels.retain(|kept| !label.dominates(kept));
        self.labels.push(label);
        true
    }

    pub fn labels(&self) -> &[McLabel] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn best_arrival(&self) -> Option<i32> {
        self.labels.iter().map(|label| label.arrival_time).min()
    }
}
