//! Entity clustering errors.

use super::error_code::{self, ErrorCode};
use super::GraphError;

/// Errors raised by clustering algorithms.
#[derive(Debug, thiserror::Error)]
pub enum ClusteringError {
    #[error("{algorithm} requires clean-clean ER input")]
    RequiresCleanClean { algorithm: &'static str },

    #[error("{algorithm} component of {size} vertices exceeds the limit of {limit}")]
    ComponentTooLarge {
        algorithm: &'static str,
        size: usize,
        limit: usize,
    },

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl ErrorCode for ClusteringError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            _ => error_code::CLUSTERING_ERROR,
        }
    }
}
