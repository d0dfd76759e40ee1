//! Per-run block list statistics.

use serde::Serialize;

/// Global statistics of one block list. Computed once per run and passed
/// by reference; nothing here is process-wide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BlockStatistics {
    /// Number of blocks.
    pub blocks: usize,
    /// Number of flat entity ids in the index.
    pub entities: usize,
    /// Total entity memberships over all blocks.
    pub assignments: usize,
    /// Total comparisons induced by the blocks.
    pub comparisons: u64,
    /// Mean block size in entity memberships.
    pub average_block_size: f64,
}

impl BlockStatistics {
    /// Default top-K of cardinality edge pruning: half the assignments.
    pub fn edge_cardinality(&self) -> usize {
        (self.assignments / 2).max(1)
    }

    /// Default top-k of cardinality node pruning:
    /// `max(1, floor(assignments / entities - 1))`.
    pub fn node_cardinality(&self) -> usize {
        if self.entities == 0 {
            return 1;
        }
        let k = (self.assignments as f64 / self.entities as f64 - 1.0).floor();
        if k < 1.0 {
            1
        } else {
            k as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_cardinality_is_at_least_one() {
        let stats = BlockStatistics {
            blocks: 2,
            entities: 10,
            assignments: 12,
            ..Default::default()
        };
        assert_eq!(stats.node_cardinality(), 1);

        let stats = BlockStatistics {
            entities: 4,
            assignments: 17,
            ..stats
        };
        assert_eq!(stats.node_cardinality(), 3);
    }

    #[test]
    fn test_edge_cardinality_is_half_the_assignments() {
        let stats = BlockStatistics {
            assignments: 9,
            ..Default::default()
        };
        assert_eq!(stats.edge_cardinality(), 4);
    }
}
