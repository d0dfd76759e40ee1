//! Candidate graph construction and edge weighting.

pub mod candidate_graph;
pub mod distribution;
pub mod schemes;

pub use candidate_graph::{CandidateGraph, WeightedNeighbor};
pub use distribution::mean_plus_k_stddev;
pub use schemes::{PairEvidence, Weigh};
