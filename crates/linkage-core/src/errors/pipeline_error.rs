//! Top-level error of a meta-blocking + clustering run.

use super::{BlockError, ClusteringError, ConfigError, ErrorCode, GraphError, PairsError};

/// Errors that can occur during a run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    #[error("Similarity pairs error: {0}")]
    Pairs(#[from] PairsError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Clustering error: {0}")]
    Clustering(#[from] ClusteringError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Block(e) => e.error_code(),
            Self::Pairs(e) => e.error_code(),
            Self::Graph(e) => e.error_code(),
            Self::Clustering(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
