//! Comparison Propagation: redundancy-free comparisons without weighting.

use std::time::Instant;

use rayon::prelude::*;

use linkage_core::constants::DEFAULT_MAX_COMPARISONS;
use linkage_core::errors::BlockError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{Block, BlockId, Comparison, PruningMethod};

use super::types::{Prune, PruningOutcome, PruningStats};
use crate::index::EntityIndex;

/// Emits every distinct pair exactly once, from the lowest-indexed block
/// both entities share. Weights are `0.0`.
#[derive(Debug, Clone)]
pub struct ComparisonPropagation {
    max_comparisons: u64,
}

impl Default for ComparisonPropagation {
    fn default() -> Self {
        Self {
            max_comparisons: DEFAULT_MAX_COMPARISONS,
        }
    }
}

impl ComparisonPropagation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_comparisons(mut self, max_comparisons: u64) -> Self {
        self.max_comparisons = max_comparisons;
        self
    }
}

impl Prune for ComparisonPropagation {
    fn method(&self) -> PruningMethod {
        PruningMethod::ComparisonPropagation
    }

    fn prune(&self, blocks: &[Block], clean_clean: bool) -> Result<PruningOutcome, BlockError> {
        let start = Instant::now();
        let index = EntityIndex::build_with_limit(blocks, clean_clean, self.max_comparisons)?;
        let id_space = index.id_space();

        let index_ref = &index;
        let mut owned: Vec<Comparison> = blocks
            .par_iter()
            .enumerate()
            .flat_map_iter(move |(b, block)| {
                block.pairs().filter_map(move |(x, y)| {
                    let (fx, fy) = if clean_clean {
                        (x.index(), id_space.dataset_limit() + y.index())
                    } else {
                        (x.index(), y.index())
                    };
                    if !index_ref.is_first_common_block(fx, fy, BlockId(b as u32)) {
                        return None;
                    }
                    Comparison::new(x, y, clean_clean)
                })
            })
            .collect();
        // A block listing an entity twice repeats its pairs.
        owned.par_sort_unstable_by_key(|c| c.key());
        owned.dedup_by_key(|c| c.key());

        let mut stats = PruningStats::new(self.method(), index.statistics().comparisons);
        stats.candidate_edges = owned.len();
        let outcome = PruningOutcome::from_comparisons(clean_clean, owned, stats);
        tracing::info!(
            method = %self.method(),
            retained = outcome.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "comparison propagation complete"
        );
        Ok(outcome)
    }
}

impl Configurable for ComparisonPropagation {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        Vec::new()
    }
}
