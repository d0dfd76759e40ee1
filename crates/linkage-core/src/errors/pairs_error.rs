//! Similarity pair construction errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while filling or validating `SimilarityPairs`.
#[derive(Debug, thiserror::Error)]
pub enum PairsError {
    #[error("Similarity pairs capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("Parallel arrays differ in length: ids1={ids1}, ids2={ids2}, weights={weights}")]
    LengthMismatch {
        ids1: usize,
        ids2: usize,
        weights: usize,
    },

    #[error("Weight at position {index} is not finite")]
    NonFiniteWeight { index: usize },
}

impl ErrorCode for PairsError {
    fn error_code(&self) -> &'static str {
        error_code::PAIRS_ERROR
    }
}
