//! Block list validation errors.

use super::error_code::{self, ErrorCode};

/// Fatal problems with the block list handed to meta-blocking.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("Block list is empty")]
    EmptyBlockList,

    #[error("Block {index} does not match the block type of the run (clean_clean = {clean_clean})")]
    MixedBlockTypes { index: usize, clean_clean: bool },

    #[error("Entity id {id} is outside the indexed range [0, {limit})")]
    EntityOutOfRange { id: u32, limit: usize },

    #[error("Block list induces {count} comparisons, above the capacity of {capacity}")]
    TooManyComparisons { count: u64, capacity: u64 },
}

impl ErrorCode for BlockError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TooManyComparisons { .. } => error_code::TOO_MANY_COMPARISONS,
            _ => error_code::BLOCK_ERROR,
        }
    }
}
