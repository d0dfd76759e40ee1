//! Data model for Linkage.
//! Dense ids, blocks, comparisons, similarity pairs, clusters, strategy selectors.

pub mod block;
pub mod cluster;
pub mod collections;
pub mod comparison;
pub mod identifiers;
pub mod methods;
pub mod similarity_pairs;

pub use block::Block;
pub use cluster::{EquivalenceCluster, VertexWeight};
pub use collections::{FxHashMap, FxHashSet};
pub use comparison::Comparison;
pub use identifiers::{BlockId, Dataset, EntityId, IdSpace};
pub use methods::{ClusteringMethod, PruningMethod, WeightingScheme};
pub use similarity_pairs::{total_comparisons, SimilarityPairs, SimilarityPairsBuilder};
