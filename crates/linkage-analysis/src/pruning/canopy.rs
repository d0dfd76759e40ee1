//! Canopy and Extended Canopy Clustering.
//!
//! Both cover the entities with overlapping canopies built around centers
//! drawn from a pool in ascending id order, and emit one block per canopy.
//! Similarities come from the weighted candidate graph (JS by default).
//! In clean-clean mode centers are D1 entities and canopies hold D2
//! entities; only the D2 pool shrinks as canopies claim members.

use std::cmp::Ordering;
use std::time::Instant;

use linkage_core::constants::{
    DEFAULT_CANOPY_EXCLUSIVE, DEFAULT_CANOPY_INCLUSIVE, DEFAULT_EXTENDED_CANOPY_EXCLUSIVE,
    DEFAULT_EXTENDED_CANOPY_INCLUSIVE, DEFAULT_MAX_COMPARISONS, WEIGHT_TOLERANCE,
};
use linkage_core::errors::BlockError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{Block, EntityId, PruningMethod, WeightingScheme};

use super::meta_blocking::weighting_scheme_parameter;
use super::types::{Prune, PruningOutcome, PruningStats};
use crate::index::EntityIndex;
use crate::weighting::{CandidateGraph, WeightedNeighbor};

/// How a canopy selects its members.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanopyRadius {
    /// Loose and tight similarity thresholds.
    Threshold { inclusive: f64, exclusive: f64 },
    /// Nearest-neighbor counts: `inclusive` join, the best `exclusive`
    /// of them leave the pool.
    Nearest { inclusive: usize, exclusive: usize },
}

#[derive(Debug, Clone)]
pub struct CanopyClustering {
    radius: CanopyRadius,
    scheme: WeightingScheme,
    max_comparisons: u64,
}

impl Default for CanopyClustering {
    fn default() -> Self {
        Self::new(DEFAULT_CANOPY_INCLUSIVE, DEFAULT_CANOPY_EXCLUSIVE)
    }
}

impl CanopyClustering {
    /// Threshold canopies: members reach `inclusive`, members reaching
    /// `exclusive` leave the pool.
    pub fn new(inclusive: f64, exclusive: f64) -> Self {
        Self {
            radius: CanopyRadius::Threshold {
                inclusive,
                exclusive,
            },
            scheme: WeightingScheme::Js,
            max_comparisons: DEFAULT_MAX_COMPARISONS,
        }
    }

    /// Extended canopies: the `inclusive` nearest pool entities join,
    /// the `exclusive` nearest leave the pool.
    pub fn extended(inclusive: usize, exclusive: usize) -> Self {
        Self {
            radius: CanopyRadius::Nearest {
                inclusive,
                exclusive,
            },
            scheme: WeightingScheme::Js,
            max_comparisons: DEFAULT_MAX_COMPARISONS,
        }
    }

    pub fn extended_default() -> Self {
        Self::extended(
            DEFAULT_EXTENDED_CANOPY_INCLUSIVE,
            DEFAULT_EXTENDED_CANOPY_EXCLUSIVE,
        )
    }

    pub fn with_scheme(mut self, scheme: WeightingScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_max_comparisons(mut self, max_comparisons: u64) -> Self {
        self.max_comparisons = max_comparisons;
        self
    }

    pub fn radius(&self) -> CanopyRadius {
        self.radius
    }

    /// Build canopies over a weighted graph.
    pub fn canopies(&self, index: &EntityIndex, graph: &CandidateGraph) -> Vec<Block> {
        let id_space = graph.id_space();
        let clean_clean = graph.is_clean_clean();
        let limit = id_space.dataset_limit();
        let centers = if clean_clean { limit } else { graph.len() };

        // Entities outside every block never enter the pool.
        let mut in_pool: Vec<bool> = (0..graph.len())
            .map(|e| index.block_count_of(e) > 0)
            .collect();
        let mut canopies = Vec::new();

        for center in 0..centers {
            if !in_pool[center] {
                continue;
            }
            in_pool[center] = false;

            let mut candidates: Vec<WeightedNeighbor> = graph
                .neighbors(center)
                .iter()
                .filter(|n| in_pool[n.neighbor])
                .copied()
                .collect();

            let (members, removed) = self.select(&mut candidates);
            for &n in &removed {
                in_pool[n] = false;
            }
            if members.is_empty() {
                continue;
            }

            let block = if clean_clean {
                Block::Bilateral {
                    d1: vec![EntityId(center as u32)],
                    d2: members
                        .iter()
                        .map(|&m| EntityId((m - limit) as u32))
                        .collect(),
                }
            } else {
                let mut entities: Vec<EntityId> =
                    members.iter().map(|&m| EntityId(m as u32)).collect();
                entities.push(EntityId(center as u32));
                entities.sort_unstable();
                Block::Unilateral { entities }
            };
            canopies.push(block);
        }
        canopies
    }

    /// Split pool candidates into canopy members and entities leaving the
    /// pool. Both come back ascending by id.
    fn select(&self, candidates: &mut [WeightedNeighbor]) -> (Vec<usize>, Vec<usize>) {
        match self.radius {
            CanopyRadius::Threshold {
                inclusive,
                exclusive,
            } => {
                let members = candidates
                    .iter()
                    .filter(|n| n.weight + WEIGHT_TOLERANCE >= inclusive)
                    .map(|n| n.neighbor)
                    .collect();
                let removed = candidates
                    .iter()
                    .filter(|n| n.weight + WEIGHT_TOLERANCE >= exclusive)
                    .map(|n| n.neighbor)
                    .collect();
                (members, removed)
            }
            CanopyRadius::Nearest {
                inclusive,
                exclusive,
            } => {
                candidates.sort_unstable_by(nearest_first);
                let mut members: Vec<usize> = candidates
                    .iter()
                    .take(inclusive)
                    .map(|n| n.neighbor)
                    .collect();
                let mut removed: Vec<usize> = members.iter().take(exclusive).copied().collect();
                members.sort_unstable();
                removed.sort_unstable();
                (members, removed)
            }
        }
    }
}

fn nearest_first(a: &WeightedNeighbor, b: &WeightedNeighbor) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.neighbor.cmp(&b.neighbor))
}

impl Prune for CanopyClustering {
    fn method(&self) -> PruningMethod {
        match self.radius {
            CanopyRadius::Threshold { .. } => PruningMethod::CanopyClustering,
            CanopyRadius::Nearest { .. } => PruningMethod::ExtendedCanopyClustering,
        }
    }

    fn prune(&self, blocks: &[Block], clean_clean: bool) -> Result<PruningOutcome, BlockError> {
        let start = Instant::now();
        let index = EntityIndex::build_with_limit(blocks, clean_clean, self.max_comparisons)?;
        let graph = CandidateGraph::build(&index, blocks, self.scheme);
        let canopies = self.canopies(&index, &graph);

        let mut stats = PruningStats::new(self.method(), index.statistics().comparisons);
        stats.scheme = Some(self.scheme);
        stats.candidate_edges = graph.edge_count();
        let canopy_count = canopies.len();
        let outcome = PruningOutcome::from_blocks(clean_clean, canopies, stats);
        tracing::info!(
            method = %self.method(),
            canopies = canopy_count,
            retained = outcome.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "canopy clustering complete"
        );
        Ok(outcome)
    }
}

impl Configurable for CanopyClustering {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        let mut params = vec![weighting_scheme_parameter(self.scheme)];
        match self.radius {
            CanopyRadius::Threshold {
                inclusive,
                exclusive,
            } => {
                params.push(ParameterSpec::float(
                    "inclusive_threshold",
                    "Loose radius: minimum similarity to join a canopy",
                    inclusive,
                    0.0,
                    1.0,
                    0.05,
                ));
                params.push(ParameterSpec::float(
                    "exclusive_threshold",
                    "Tight radius: minimum similarity to leave the pool",
                    exclusive,
                    0.0,
                    1.0,
                    0.05,
                ));
            }
            CanopyRadius::Nearest {
                inclusive,
                exclusive,
            } => {
                params.push(ParameterSpec::integer(
                    "inclusive_cardinality",
                    "Nearest pool entities placed in each canopy",
                    inclusive as i64,
                    1,
                    100,
                    1,
                ));
                params.push(ParameterSpec::integer(
                    "exclusive_cardinality",
                    "Nearest canopy members removed from the pool",
                    exclusive as i64,
                    0,
                    100,
                    1,
                ));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_canopies_cover_dirty_entities() {
        let blocks = vec![
            Block::unilateral([0, 1]),
            Block::unilateral([0, 1]),
            Block::unilateral([2, 3]),
        ];
        let outcome = CanopyClustering::new(0.1, 0.5)
            .with_scheme(WeightingScheme::Cbs)
            .prune(&blocks, false)
            .unwrap();
        let canopies = outcome.into_blocks();
        assert_eq!(
            canopies,
            vec![Block::unilateral([0, 1]), Block::unilateral([2, 3])]
        );
    }

    #[test]
    fn test_loose_members_stay_in_pool() {
        // 0-1 strong, 0-2 weak; 2 stays available for its own canopy.
        let blocks = vec![
            Block::unilateral([0, 1]),
            Block::unilateral([0, 1]),
            Block::unilateral([0, 2]),
            Block::unilateral([2, 3]),
        ];
        let outcome = CanopyClustering::new(1.0, 2.0)
            .with_scheme(WeightingScheme::Cbs)
            .prune(&blocks, false)
            .unwrap();
        let canopies = outcome.into_blocks();
        assert_eq!(
            canopies,
            vec![Block::unilateral([0, 1, 2]), Block::unilateral([2, 3])]
        );
    }

    #[test]
    fn test_extended_canopy_takes_nearest() {
        let blocks = vec![
            Block::bilateral([0], [0, 1, 2]),
            Block::bilateral([0], [1]),
            Block::bilateral([1], [0, 2]),
        ];
        let outcome = CanopyClustering::extended(1, 1)
            .with_scheme(WeightingScheme::Cbs)
            .prune(&blocks, true)
            .unwrap();
        assert_eq!(outcome.stats.method, PruningMethod::ExtendedCanopyClustering);
        let canopies = outcome.into_blocks();
        assert_eq!(
            canopies,
            vec![Block::bilateral([0], [1]), Block::bilateral([1], [0])]
        );
    }
}
