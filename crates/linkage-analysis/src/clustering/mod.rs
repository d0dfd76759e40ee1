//! Entity clustering over weighted similarity pairs.
//!
//! Every algorithm implements [`Cluster`]: pairs are thresholded into a
//! [`SimilarityGraph`], the algorithm groups its vertices, and the groups
//! become [`EquivalenceCluster`](linkage_core::types::EquivalenceCluster)s
//! with singletons dropped.

pub mod center;
pub mod connected_components;
pub mod correlation;
pub mod cut;
pub mod heap;
pub mod markov;
pub mod merge_center;
pub mod ricochet;
pub mod types;
pub mod unique_mapping;

pub use center::CenterClustering;
pub use connected_components::ConnectedComponentsClustering;
pub use correlation::CorrelationClustering;
pub use cut::CutClustering;
pub use heap::IndexedMaxHeap;
pub use markov::MarkovClustering;
pub use merge_center::MergeCenterClustering;
pub use ricochet::RicochetSrClustering;
pub use types::{resolve_threshold, Cluster, SimilarityEdge, SimilarityGraph};
pub use unique_mapping::UniqueMappingClustering;
