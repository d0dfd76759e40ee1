//! Comparison pruning (meta-blocking) and alternative covering strategies.
//!
//! Weighted/cardinality edge and node pruning operate on the weighted
//! candidate graph; Comparison Propagation and (Extended) Canopy Clustering
//! bypass explicit pruning.

pub mod canopy;
pub mod comparison_propagation;
pub mod edge;
pub mod meta_blocking;
pub mod node;
pub mod types;

pub use canopy::{CanopyClustering, CanopyRadius};
pub use comparison_propagation::ComparisonPropagation;
pub use meta_blocking::MetaBlocking;
pub use types::{
    Prune, PruningOutcome, PruningPolicy, PruningRule, PruningStats, PruningUnit, Reciprocity,
};
