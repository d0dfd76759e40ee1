//! Edge weighting schemes.
//!
//! All logarithms are base 10. Any formula whose denominator is zero, or
//! whose logarithm argument is not positive, yields `0.0`, so weights stay
//! totally ordered.

use linkage_core::types::WeightingScheme;

use crate::index::BlockStatistics;

/// Co-occurrence evidence for one candidate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairEvidence {
    /// Distinct blocks shared by the pair, `cf`.
    pub common_blocks: u32,
    /// `Σ 1/size(block)` over the shared blocks.
    pub arcs: f64,
    /// `|B(e1)|`.
    pub blocks1: usize,
    /// `|B(e2)|`.
    pub blocks2: usize,
    /// `d(e1)`.
    pub comparisons1: u64,
    /// `d(e2)`.
    pub comparisons2: u64,
}

/// Narrow capability: turn pair evidence into an edge weight.
pub trait Weigh {
    fn weigh(&self, evidence: &PairEvidence, stats: &BlockStatistics) -> f64;
}

impl Weigh for WeightingScheme {
    fn weigh(&self, e: &PairEvidence, stats: &BlockStatistics) -> f64 {
        let cf = e.common_blocks as f64;
        match self {
            WeightingScheme::Cbs => cf,
            WeightingScheme::Ecbs => {
                let blocks = stats.blocks as f64;
                cf * log_ratio(blocks, e.blocks1 as f64) * log_ratio(blocks, e.blocks2 as f64)
            }
            WeightingScheme::Js => jaccard(e),
            WeightingScheme::Ejs => {
                let scale = ratio(
                    log10_or_zero(stats.blocks as f64),
                    log10_or_zero(stats.average_block_size),
                );
                jaccard(e) * scale
            }
            WeightingScheme::Arcs => {
                if e.arcs.is_finite() {
                    e.arcs
                } else {
                    0.0
                }
            }
            WeightingScheme::PearsonX2 => chi_square(e, stats.blocks as f64),
        }
    }
}

/// `cf / (d(e1) + d(e2) - cf)`.
fn jaccard(e: &PairEvidence) -> f64 {
    let cf = e.common_blocks as f64;
    ratio(cf, e.comparisons1 as f64 + e.comparisons2 as f64 - cf)
}

/// Chi-square statistic of the 2×2 block co-occurrence table.
fn chi_square(e: &PairEvidence, blocks: f64) -> f64 {
    let b1 = e.blocks1 as f64;
    let b2 = e.blocks2 as f64;
    let n11 = e.common_blocks as f64;
    let n12 = b1 - n11;
    let n21 = b2 - n11;
    let n22 = blocks - b1 - b2 + n11;
    let numerator = blocks * (n11 * n22 - n12 * n21).powi(2);
    let denominator = b1 * (blocks - b1) * b2 * (blocks - b2);
    ratio(numerator, denominator)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let v = numerator / denominator;
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn log_ratio(numerator: f64, denominator: f64) -> f64 {
    log10_or_zero(ratio(numerator, denominator))
}

fn log10_or_zero(x: f64) -> f64 {
    if x > 0.0 && x.is_finite() {
        x.log10()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> BlockStatistics {
        BlockStatistics {
            blocks: 100,
            entities: 50,
            assignments: 400,
            comparisons: 1000,
            average_block_size: 4.0,
        }
    }

    fn evidence(cf: u32) -> PairEvidence {
        PairEvidence {
            common_blocks: cf,
            arcs: cf as f64 * 0.25,
            blocks1: 10,
            blocks2: 10,
            comparisons1: 30,
            comparisons2: 30,
        }
    }

    #[test]
    fn test_cbs_is_common_block_count() {
        assert_eq!(WeightingScheme::Cbs.weigh(&evidence(3), &stats()), 3.0);
    }

    #[test]
    fn test_ecbs_uses_log_base_ten() {
        let w = WeightingScheme::Ecbs.weigh(&evidence(2), &stats());
        assert!((w - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_js_formula() {
        let w = WeightingScheme::Js.weigh(&evidence(6), &stats());
        assert!((w - 6.0 / 54.0).abs() < 1e-12);
    }

    #[test]
    fn test_ejs_scales_js() {
        let js = WeightingScheme::Js.weigh(&evidence(6), &stats());
        let ejs = WeightingScheme::Ejs.weigh(&evidence(6), &stats());
        assert!((ejs - js * 2.0 / 4f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_ejs_is_zero_for_unit_block_size() {
        let s = BlockStatistics {
            average_block_size: 1.0,
            ..stats()
        };
        assert_eq!(WeightingScheme::Ejs.weigh(&evidence(6), &s), 0.0);
    }

    #[test]
    fn test_chi_square_of_independent_pair_is_zero() {
        let e = PairEvidence {
            common_blocks: 1,
            blocks1: 10,
            blocks2: 10,
            ..Default::default()
        };
        assert_eq!(WeightingScheme::PearsonX2.weigh(&e, &stats()), 0.0);
    }

    #[test]
    fn test_degenerate_inputs_give_zero() {
        let empty = PairEvidence::default();
        let s = BlockStatistics::default();
        for scheme in WeightingScheme::ALL {
            let w = scheme.weigh(&empty, &s);
            assert_eq!(w, 0.0, "{scheme} produced {w}");
        }
    }
}
