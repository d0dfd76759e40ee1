//! Pruning policy, outcome and the `Prune` capability.

use std::borrow::Cow;

use serde::Serialize;

use linkage_core::errors::{BlockError, PipelineError};
use linkage_core::params::Configurable;
use linkage_core::types::{
    Block, Comparison, PruningMethod, SimilarityPairs, SimilarityPairsBuilder, WeightingScheme,
};

/// Which weight distribution a pruning rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PruningUnit {
    /// One global distribution over all edges.
    Edge,
    /// One local distribution per entity.
    Node,
}

/// What a unit keeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PruningRule {
    /// Keep weights `≥ mean + filter_ratio · stdev`.
    Threshold { filter_ratio: f64 },
    /// Keep the top-K weights; `None` derives K from the block statistics.
    Cardinality { k: Option<usize> },
}

/// How node votes combine into edge decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reciprocity {
    /// Either endpoint's vote keeps the edge.
    None,
    /// Both endpoints must vote for the edge.
    Reciprocal,
}

/// A pruning policy: unit × rule × reciprocity.
///
/// Reciprocity only affects the node unit; an edge-unit policy has a
/// single global vote per edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PruningPolicy {
    pub unit: PruningUnit,
    pub rule: PruningRule,
    pub reciprocity: Reciprocity,
}

impl PruningPolicy {
    pub fn new(unit: PruningUnit, rule: PruningRule, reciprocity: Reciprocity) -> Self {
        Self {
            unit,
            rule,
            reciprocity,
        }
    }

    /// The named strategy this policy corresponds to.
    pub fn method(&self) -> PruningMethod {
        use PruningRule::{Cardinality, Threshold};
        match (self.unit, self.rule, self.reciprocity) {
            (PruningUnit::Edge, Threshold { .. }, _) => PruningMethod::WeightedEdgePruning,
            (PruningUnit::Edge, Cardinality { .. }, _) => PruningMethod::CardinalityEdgePruning,
            (PruningUnit::Node, Threshold { .. }, Reciprocity::None) => {
                PruningMethod::WeightedNodePruning
            }
            (PruningUnit::Node, Cardinality { .. }, Reciprocity::None) => {
                PruningMethod::CardinalityNodePruning
            }
            (PruningUnit::Node, Threshold { .. }, Reciprocity::Reciprocal) => {
                PruningMethod::ReciprocalWeightedNodePruning
            }
            (PruningUnit::Node, Cardinality { .. }, Reciprocity::Reciprocal) => {
                PruningMethod::ReciprocalCardinalityNodePruning
            }
        }
    }
}

/// Counters describing one pruning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PruningStats {
    pub method: PruningMethod,
    /// Weighting scheme, when the strategy weighs the candidate graph.
    pub scheme: Option<WeightingScheme>,
    /// Raw comparisons induced by the input blocks.
    pub input_comparisons: u64,
    /// Distinct candidate pairs before pruning.
    pub candidate_edges: usize,
    /// Distinct comparisons retained.
    pub retained: usize,
    /// Global weight threshold, for edge-threshold pruning.
    pub threshold: Option<f64>,
    /// Effective top-K, for cardinality pruning.
    pub cardinality: Option<usize>,
}

impl PruningStats {
    pub fn new(method: PruningMethod, input_comparisons: u64) -> Self {
        Self {
            method,
            scheme: None,
            input_comparisons,
            candidate_edges: 0,
            retained: 0,
            threshold: None,
            cardinality: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Retained {
    Comparisons(Vec<Comparison>),
    Blocks(Vec<Block>),
}

/// Result of a pruning or covering strategy.
#[derive(Debug, Clone)]
pub struct PruningOutcome {
    clean_clean: bool,
    retained: Retained,
    pub stats: PruningStats,
}

impl PruningOutcome {
    /// Outcome holding individual comparisons; they are sorted by `(id1, id2)`.
    pub fn from_comparisons(
        clean_clean: bool,
        mut comparisons: Vec<Comparison>,
        mut stats: PruningStats,
    ) -> Self {
        comparisons.sort_unstable_by_key(|c| c.key());
        stats.retained = comparisons.len();
        Self {
            clean_clean,
            retained: Retained::Comparisons(comparisons),
            stats,
        }
    }

    /// Outcome holding new blocks, as produced by canopy clustering.
    pub fn from_blocks(clean_clean: bool, blocks: Vec<Block>, mut stats: PruningStats) -> Self {
        let mut outcome = Self {
            clean_clean,
            retained: Retained::Blocks(blocks),
            stats: stats.clone(),
        };
        stats.retained = outcome.comparisons().len();
        outcome.stats = stats;
        outcome
    }

    pub fn is_clean_clean(&self) -> bool {
        self.clean_clean
    }

    /// Distinct retained comparisons, sorted by `(id1, id2)`.
    ///
    /// For block outcomes the pairs are derived from the blocks and carry
    /// weight `0.0`.
    pub fn comparisons(&self) -> Cow<'_, [Comparison]> {
        match &self.retained {
            Retained::Comparisons(c) => Cow::Borrowed(c.as_slice()),
            Retained::Blocks(blocks) => {
                let mut out: Vec<Comparison> = blocks
                    .iter()
                    .flat_map(|b| b.pairs())
                    .filter_map(|(a, b)| Comparison::new(a, b, self.clean_clean))
                    .collect();
                out.sort_unstable_by_key(|c| c.key());
                out.dedup_by_key(|c| c.key());
                Cow::Owned(out)
            }
        }
    }

    /// Number of distinct retained comparisons.
    pub fn len(&self) -> usize {
        self.stats.retained
    }

    pub fn is_empty(&self) -> bool {
        self.stats.retained == 0
    }

    /// Retained comparisons as blocks: each comparison becomes a
    /// two-entity block, block outcomes are returned as they are.
    pub fn into_blocks(self) -> Vec<Block> {
        match self.retained {
            Retained::Blocks(blocks) => blocks,
            Retained::Comparisons(comparisons) => comparisons
                .into_iter()
                .map(|c| {
                    if self.clean_clean {
                        Block::Bilateral {
                            d1: vec![c.id1],
                            d2: vec![c.id2],
                        }
                    } else {
                        Block::Unilateral {
                            entities: vec![c.id1, c.id2],
                        }
                    }
                })
                .collect(),
        }
    }

    /// Pairs builder pre-sized from the retained block list: canopy
    /// blocks count every pair they induce, each kept comparison counts
    /// once.
    ///
    /// Fails with `TooManyComparisons` above `max_comparisons`.
    pub fn pairs_builder(
        &self,
        max_comparisons: u64,
    ) -> Result<SimilarityPairsBuilder, BlockError> {
        match &self.retained {
            Retained::Blocks(blocks) => {
                SimilarityPairsBuilder::for_blocks(blocks, self.clean_clean, max_comparisons)
            }
            Retained::Comparisons(c) => SimilarityPairsBuilder::for_total(
                c.len() as u64,
                self.clean_clean,
                max_comparisons,
            ),
        }
    }

    /// Retained comparisons with their meta-blocking weights.
    pub fn to_similarity_pairs(
        &self,
        max_comparisons: u64,
    ) -> Result<SimilarityPairs, PipelineError> {
        let mut builder = self.pairs_builder(max_comparisons)?;
        for c in self.comparisons().iter() {
            builder.push_comparison(c)?;
        }
        Ok(builder.finish())
    }
}

/// Narrow capability: reduce a block list to a cheaper comparison set.
pub trait Prune: Configurable + Send + Sync {
    /// The named strategy implemented.
    fn method(&self) -> PruningMethod;

    /// Index, weigh and prune `blocks`.
    fn prune(&self, blocks: &[Block], clean_clean: bool) -> Result<PruningOutcome, BlockError>;
}
