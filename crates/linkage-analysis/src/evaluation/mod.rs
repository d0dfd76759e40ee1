//! Effectiveness measures against known duplicates.

pub mod ground_truth;
pub mod quality;

pub use ground_truth::GroundTruth;
pub use quality::{BlockingQuality, ClusterQuality};
