//! Configuration system with layered resolution.

pub mod clustering_config;
pub mod linkage_config;
pub mod metablocking_config;

pub use clustering_config::{ClusteringConfig, SimilarityThreshold};
pub use linkage_config::{ConfigOverrides, LinkageConfig};
pub use metablocking_config::MetablockingConfig;
