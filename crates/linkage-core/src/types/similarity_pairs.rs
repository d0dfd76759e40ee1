//! Bulk transfer of weighted pairs between matching and clustering.

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::comparison::Comparison;
use super::identifiers::EntityId;
use crate::errors::{BlockError, PairsError};

/// Immutable parallel arrays of `(id1, id2, weight)` triples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPairs {
    ids1: Vec<EntityId>,
    ids2: Vec<EntityId>,
    weights: Vec<f64>,
    clean_clean: bool,
}

impl SimilarityPairs {
    /// Build from three already filled vectors.
    pub fn from_vectors(
        ids1: Vec<EntityId>,
        ids2: Vec<EntityId>,
        weights: Vec<f64>,
        clean_clean: bool,
    ) -> Result<Self, PairsError> {
        if ids1.len() != ids2.len() || ids1.len() != weights.len() {
            return Err(PairsError::LengthMismatch {
                ids1: ids1.len(),
                ids2: ids2.len(),
                weights: weights.len(),
            });
        }
        if let Some(index) = weights.iter().position(|w| !w.is_finite()) {
            return Err(PairsError::NonFiniteWeight { index });
        }
        Ok(Self {
            ids1,
            ids2,
            weights,
            clean_clean,
        })
    }

    /// Convenience constructor from raw `(id1, id2, weight)` triples.
    pub fn from_triples(
        triples: impl IntoIterator<Item = (u32, u32, f64)>,
        clean_clean: bool,
    ) -> Result<Self, PairsError> {
        let (mut ids1, mut ids2, mut weights) = (Vec::new(), Vec::new(), Vec::new());
        for (a, b, w) in triples {
            ids1.push(EntityId(a));
            ids2.push(EntityId(b));
            weights.push(w);
        }
        Self::from_vectors(ids1, ids2, weights, clean_clean)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn is_clean_clean(&self) -> bool {
        self.clean_clean
    }

    pub fn ids1(&self) -> &[EntityId] {
        &self.ids1
    }

    pub fn ids2(&self) -> &[EntityId] {
        &self.ids2
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate over `(id1, id2, weight)` triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, EntityId, f64)> + '_ {
        self.ids1
            .iter()
            .zip(&self.ids2)
            .zip(&self.weights)
            .map(|((&a, &b), &w)| (a, b, w))
    }

    /// Number of ids implied per side: `(max id1 + 1, max id2 + 1)`.
    pub fn id_bounds(&self) -> (usize, usize) {
        let max1 = self.ids1.iter().map(|id| id.index() + 1).max().unwrap_or(0);
        let max2 = self.ids2.iter().map(|id| id.index() + 1).max().unwrap_or(0);
        (max1, max2)
    }
}

/// Append-only builder sized from the comparison count of a block list.
#[derive(Debug)]
pub struct SimilarityPairsBuilder {
    pairs: SimilarityPairs,
    capacity: usize,
}

impl SimilarityPairsBuilder {
    /// Reserve room for exactly `capacity` pairs.
    pub fn with_capacity(capacity: usize, clean_clean: bool) -> Self {
        Self {
            pairs: SimilarityPairs {
                ids1: Vec::with_capacity(capacity),
                ids2: Vec::with_capacity(capacity),
                weights: Vec::with_capacity(capacity),
                clean_clean,
            },
            capacity,
        }
    }

    /// Reserve room for every comparison the block list induces.
    ///
    /// Fails with `TooManyComparisons` if the total exceeds `max_comparisons`
    /// or cannot be addressed on this platform.
    pub fn for_blocks(
        blocks: &[Block],
        clean_clean: bool,
        max_comparisons: u64,
    ) -> Result<Self, BlockError> {
        Self::for_total(total_comparisons(blocks)?, clean_clean, max_comparisons)
    }

    /// Reserve room for `total` comparisons under the same limits as
    /// [`for_blocks`](Self::for_blocks).
    pub fn for_total(
        total: u64,
        clean_clean: bool,
        max_comparisons: u64,
    ) -> Result<Self, BlockError> {
        if total > max_comparisons {
            return Err(BlockError::TooManyComparisons {
                count: total,
                capacity: max_comparisons,
            });
        }
        let capacity = usize::try_from(total).map_err(|_| BlockError::TooManyComparisons {
            count: total,
            capacity: usize::MAX as u64,
        })?;
        Ok(Self::with_capacity(capacity, clean_clean))
    }

    /// Append one pair.
    pub fn push(&mut self, id1: EntityId, id2: EntityId, weight: f64) -> Result<(), PairsError> {
        if self.pairs.len() >= self.capacity {
            return Err(PairsError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if !weight.is_finite() {
            return Err(PairsError::NonFiniteWeight {
                index: self.pairs.len(),
            });
        }
        self.pairs.ids1.push(id1);
        self.pairs.ids2.push(id2);
        self.pairs.weights.push(weight);
        Ok(())
    }

    /// Append a comparison with its current weight.
    pub fn push_comparison(&mut self, comparison: &Comparison) -> Result<(), PairsError> {
        self.push(comparison.id1, comparison.id2, comparison.weight)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Freeze the pairs.
    pub fn finish(self) -> SimilarityPairs {
        self.pairs
    }
}

/// Total comparisons of a block list, with overflow detection.
pub fn total_comparisons(blocks: &[Block]) -> Result<u64, BlockError> {
    blocks.iter().try_fold(0u64, |acc, block| {
        acc.checked_add(block.comparisons())
            .ok_or(BlockError::TooManyComparisons {
                count: u64::MAX,
                capacity: u64::MAX,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_capacity_from_blocks() {
        let blocks = vec![Block::unilateral([0, 1, 2]), Block::unilateral([1, 2, 3])];
        let builder = SimilarityPairsBuilder::for_blocks(&blocks, false, u64::MAX).unwrap();
        assert_eq!(builder.capacity, 6);
    }

    #[test]
    fn test_builder_rejects_overflow() {
        let mut builder = SimilarityPairsBuilder::with_capacity(1, false);
        builder.push(EntityId(0), EntityId(1), 0.5).unwrap();
        let err = builder.push(EntityId(0), EntityId(2), 0.5).unwrap_err();
        assert!(matches!(err, PairsError::CapacityExceeded { capacity: 1 }));
    }

    #[test]
    fn test_too_many_comparisons() {
        let blocks = vec![Block::unilateral(0..100)];
        let err = SimilarityPairsBuilder::for_blocks(&blocks, false, 10).unwrap_err();
        assert!(matches!(
            err,
            BlockError::TooManyComparisons { count: 4950, capacity: 10 }
        ));
    }

    #[test]
    fn test_from_vectors_length_mismatch() {
        let err = SimilarityPairs::from_vectors(vec![EntityId(0)], vec![], vec![0.1], false)
            .unwrap_err();
        assert!(matches!(err, PairsError::LengthMismatch { .. }));
    }

    #[test]
    fn test_nan_weight_rejected() {
        let err = SimilarityPairs::from_triples([(0, 1, f64::NAN)], false).unwrap_err();
        assert!(matches!(err, PairsError::NonFiniteWeight { index: 0 }));
    }

    #[test]
    fn test_id_bounds() {
        let pairs = SimilarityPairs::from_triples([(0, 4, 0.9), (2, 1, 0.3)], true).unwrap();
        assert_eq!(pairs.id_bounds(), (3, 5));
    }
}
