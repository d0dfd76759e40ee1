//! Blocking and clustering effectiveness measures.

use serde::Serialize;

use linkage_core::types::{Block, Comparison, EntityId, EquivalenceCluster, FxHashSet};

use super::ground_truth::GroundTruth;
use crate::index::raw_comparisons;

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Comparisons an exhaustive run over the id space would execute.
fn brute_force_comparisons(truth: &GroundTruth) -> u64 {
    let space = truth.id_space();
    if space.is_clean_clean() {
        let d1 = space.dataset_limit() as u64;
        let d2 = (space.len() - space.dataset_limit()) as u64;
        d1.saturating_mul(d2)
    } else {
        let n = space.len() as u64;
        n.saturating_mul(n.saturating_sub(1)) / 2
    }
}

/// Pair completeness, pair quality and reduction ratio of a candidate set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockingQuality {
    pub detected_duplicates: usize,
    pub total_duplicates: usize,
    pub comparisons: u64,
    pub brute_force_comparisons: u64,
    /// Share of true matches among the candidates (recall).
    pub pair_completeness: f64,
    /// Share of candidates that are true matches (precision).
    pub pair_quality: f64,
    /// Share of the exhaustive comparisons saved.
    pub reduction_ratio: f64,
}

impl BlockingQuality {
    /// Measure a comparison list, one comparison per entry.
    pub fn of_comparisons(comparisons: &[Comparison], truth: &GroundTruth) -> Self {
        Self::measure(
            comparisons.iter().map(|c| (c.id1, c.id2)),
            comparisons.len() as u64,
            truth,
        )
    }

    /// Measure a block list, counting every redundant comparison.
    pub fn of_blocks(blocks: &[Block], truth: &GroundTruth) -> Self {
        let pairs = raw_comparisons(blocks);
        let total = pairs.len() as u64;
        Self::measure(pairs.into_iter(), total, truth)
    }

    fn measure(
        pairs: impl Iterator<Item = (EntityId, EntityId)>,
        comparisons: u64,
        truth: &GroundTruth,
    ) -> Self {
        // Clean-clean pairs are ordered: (a, b) and (b, a) are different matches.
        let clean_clean = truth.id_space().is_clean_clean();
        let mut detected = FxHashSet::default();
        for (a, b) in pairs {
            if truth.contains(a, b) {
                detected.insert(if clean_clean { (a, b) } else { (a.min(b), a.max(b)) });
            }
        }
        let detected_duplicates = detected.len();
        let brute_force = brute_force_comparisons(truth);
        let quality = Self {
            detected_duplicates,
            total_duplicates: truth.len(),
            comparisons,
            brute_force_comparisons: brute_force,
            pair_completeness: ratio(detected_duplicates as f64, truth.len() as f64),
            pair_quality: ratio(detected_duplicates as f64, comparisons as f64),
            reduction_ratio: if brute_force > 0 {
                1.0 - comparisons as f64 / brute_force as f64
            } else {
                0.0
            },
        };
        tracing::info!(
            pc = quality.pair_completeness,
            pq = quality.pair_quality,
            rr = quality.reduction_ratio,
            comparisons,
            "blocking quality"
        );
        quality
    }
}

/// Pairwise precision, recall and F1 of a clustering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterQuality {
    pub true_positives: usize,
    pub predicted_pairs: usize,
    pub total_duplicates: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClusterQuality {
    pub fn evaluate(clusters: &[EquivalenceCluster], truth: &GroundTruth) -> Self {
        let mut true_positives = 0;
        let mut predicted_pairs = 0;
        for cluster in clusters {
            for (a, b) in cluster.pairs() {
                predicted_pairs += 1;
                if truth.contains(a, b) {
                    true_positives += 1;
                }
            }
        }
        let precision = ratio(true_positives as f64, predicted_pairs as f64);
        let recall = ratio(true_positives as f64, truth.len() as f64);
        let f1 = ratio(2.0 * precision * recall, precision + recall);
        tracing::info!(precision, recall, f1, clusters = clusters.len(), "cluster quality");
        Self {
            true_positives,
            predicted_pairs,
            total_duplicates: truth.len(),
            precision,
            recall,
            f1,
        }
    }
}
