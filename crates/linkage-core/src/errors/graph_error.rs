//! Graph utility errors.

use super::error_code::{self, ErrorCode};

/// Errors raised by graph construction and flow computations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Vertex {vertex} is outside the graph of {vertices} vertices")]
    VertexOutOfRange { vertex: usize, vertices: usize },

    #[error("Self loop on vertex {vertex}")]
    SelfLoop { vertex: usize },

    #[error("Negative or non-finite capacity {capacity} on edge ({from}, {to})")]
    InvalidCapacity { from: usize, to: usize, capacity: f64 },

    #[error("Source and sink are the same vertex {vertex}")]
    DegenerateCut { vertex: usize },
}

impl ErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        error_code::GRAPH_ERROR
    }
}
