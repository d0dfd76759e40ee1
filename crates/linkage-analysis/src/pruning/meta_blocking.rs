//! The six graph-based meta-blocking strategies.

use std::time::Instant;

use linkage_core::constants::{DEFAULT_FILTER_RATIO, DEFAULT_MAX_COMPARISONS};
use linkage_core::errors::BlockError;
use linkage_core::params::{Configurable, ParameterSpec};
use linkage_core::types::{Block, PruningMethod, WeightingScheme};

use super::edge::{top_k_edges, weighted_edges};
use super::node::{cardinality_votes, combine_votes, threshold_votes};
use super::types::{
    Prune, PruningOutcome, PruningPolicy, PruningRule, PruningStats, PruningUnit, Reciprocity,
};
use crate::index::EntityIndex;
use crate::weighting::CandidateGraph;

/// Weighted or cardinality pruning of the blocking graph, at edge or node
/// level, optionally reciprocal.
#[derive(Debug, Clone)]
pub struct MetaBlocking {
    policy: PruningPolicy,
    scheme: WeightingScheme,
    max_comparisons: u64,
}

impl MetaBlocking {
    pub fn new(policy: PruningPolicy, scheme: WeightingScheme) -> Self {
        Self {
            policy,
            scheme,
            max_comparisons: DEFAULT_MAX_COMPARISONS,
        }
    }

    /// Weighted Edge Pruning.
    pub fn wep(scheme: WeightingScheme) -> Self {
        Self::new(threshold(PruningUnit::Edge, Reciprocity::None), scheme)
    }

    /// Cardinality Edge Pruning.
    pub fn cep(scheme: WeightingScheme) -> Self {
        Self::new(cardinality(PruningUnit::Edge, Reciprocity::None), scheme)
    }

    /// Weighted Node Pruning.
    pub fn wnp(scheme: WeightingScheme) -> Self {
        Self::new(threshold(PruningUnit::Node, Reciprocity::None), scheme)
    }

    /// Cardinality Node Pruning.
    pub fn cnp(scheme: WeightingScheme) -> Self {
        Self::new(cardinality(PruningUnit::Node, Reciprocity::None), scheme)
    }

    /// Reciprocal Weighted Node Pruning.
    pub fn reciprocal_wnp(scheme: WeightingScheme) -> Self {
        Self::new(threshold(PruningUnit::Node, Reciprocity::Reciprocal), scheme)
    }

    /// Reciprocal Cardinality Node Pruning.
    pub fn reciprocal_cnp(scheme: WeightingScheme) -> Self {
        Self::new(
            cardinality(PruningUnit::Node, Reciprocity::Reciprocal),
            scheme,
        )
    }

    /// Replace the rule's filter ratio; no effect on cardinality rules.
    pub fn with_filter_ratio(mut self, filter_ratio: f64) -> Self {
        if let PruningRule::Threshold { .. } = self.policy.rule {
            self.policy.rule = PruningRule::Threshold { filter_ratio };
        }
        self
    }

    /// Fix the top-K; no effect on threshold rules.
    pub fn with_cardinality(mut self, k: Option<usize>) -> Self {
        if let PruningRule::Cardinality { .. } = self.policy.rule {
            self.policy.rule = PruningRule::Cardinality { k };
        }
        self
    }

    pub fn with_max_comparisons(mut self, max_comparisons: u64) -> Self {
        self.max_comparisons = max_comparisons;
        self
    }

    pub fn policy(&self) -> PruningPolicy {
        self.policy
    }

    pub fn scheme(&self) -> WeightingScheme {
        self.scheme
    }

    /// Apply the policy to an already weighted graph.
    pub fn prune_graph(&self, index: &EntityIndex, graph: &CandidateGraph) -> PruningOutcome {
        let stats_in = index.statistics();
        let mut stats = PruningStats::new(self.method(), stats_in.comparisons);
        stats.scheme = Some(self.scheme);
        stats.candidate_edges = graph.edge_count();

        let comparisons = match (self.policy.unit, self.policy.rule) {
            (PruningUnit::Edge, PruningRule::Threshold { filter_ratio }) => {
                let (kept, threshold) = weighted_edges(graph, filter_ratio);
                stats.threshold = threshold;
                kept
            }
            (PruningUnit::Edge, PruningRule::Cardinality { k }) => {
                let k = k.unwrap_or_else(|| stats_in.edge_cardinality());
                stats.cardinality = Some(k);
                top_k_edges(graph, k)
            }
            (PruningUnit::Node, PruningRule::Threshold { filter_ratio }) => {
                let votes = threshold_votes(graph, filter_ratio);
                combine_votes(graph, &votes, self.policy.reciprocity)
            }
            (PruningUnit::Node, PruningRule::Cardinality { k }) => {
                let k = k.unwrap_or_else(|| stats_in.node_cardinality());
                stats.cardinality = Some(k);
                let votes = cardinality_votes(graph, k);
                combine_votes(graph, &votes, self.policy.reciprocity)
            }
        };
        PruningOutcome::from_comparisons(index.is_clean_clean(), comparisons, stats)
    }
}

fn threshold(unit: PruningUnit, reciprocity: Reciprocity) -> PruningPolicy {
    PruningPolicy::new(
        unit,
        PruningRule::Threshold {
            filter_ratio: DEFAULT_FILTER_RATIO,
        },
        reciprocity,
    )
}

fn cardinality(unit: PruningUnit, reciprocity: Reciprocity) -> PruningPolicy {
    PruningPolicy::new(unit, PruningRule::Cardinality { k: None }, reciprocity)
}

impl Prune for MetaBlocking {
    fn method(&self) -> PruningMethod {
        self.policy.method()
    }

    fn prune(&self, blocks: &[Block], clean_clean: bool) -> Result<PruningOutcome, BlockError> {
        let start = Instant::now();
        let index = EntityIndex::build_with_limit(blocks, clean_clean, self.max_comparisons)?;
        let graph = CandidateGraph::build(&index, blocks, self.scheme);
        let outcome = self.prune_graph(&index, &graph);
        tracing::info!(
            method = %self.method(),
            scheme = %self.scheme,
            candidates = outcome.stats.candidate_edges,
            retained = outcome.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "meta-blocking complete"
        );
        Ok(outcome)
    }
}

impl Configurable for MetaBlocking {
    fn method_name(&self) -> &'static str {
        self.method().name()
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        let mut params = vec![weighting_scheme_parameter(self.scheme)];
        match self.policy.rule {
            PruningRule::Threshold { filter_ratio } => params.push(ParameterSpec::float(
                "filter_ratio",
                "Standard deviations above the mean weight an edge must reach",
                filter_ratio,
                -1.0,
                3.0,
                0.25,
            )),
            PruningRule::Cardinality { k } => params.push(ParameterSpec::integer(
                "cardinality",
                "Comparisons kept per unit; 0 derives it from the block statistics",
                k.unwrap_or(0) as i64,
                0,
                1_000,
                10,
            )),
        }
        params
    }
}

/// Choice parameter over every weighting scheme.
pub(crate) fn weighting_scheme_parameter(current: WeightingScheme) -> ParameterSpec {
    ParameterSpec::choice(
        "weighting_scheme",
        "Edge weighting scheme of the blocking graph",
        current.name(),
        WeightingScheme::ALL.iter().map(|s| s.name()).collect(),
    )
}
