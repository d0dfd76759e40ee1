//! Shared constants for the Linkage engine.

/// Project configuration file name.
pub const CONFIG_FILE_NAME: &str = "linkage.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "LINKAGE_";

// ---- Meta-blocking ----

/// Default multiplier of the standard deviation added to the mean weight
/// by threshold-based pruning (0 keeps everything at or above the mean).
pub const DEFAULT_FILTER_RATIO: f64 = 0.0;

/// Default ceiling on the comparisons a block list may induce.
pub const DEFAULT_MAX_COMPARISONS: u64 = 1 << 31;

/// Default number of worker threads (0 = rayon default).
pub const DEFAULT_THREADS: usize = 0;

/// Default loose similarity radius of canopy clustering.
pub const DEFAULT_CANOPY_INCLUSIVE: f64 = 0.5;

/// Default tight similarity radius of canopy clustering.
pub const DEFAULT_CANOPY_EXCLUSIVE: f64 = 0.75;

/// Default number of nearest neighbors placed in an extended canopy.
pub const DEFAULT_EXTENDED_CANOPY_INCLUSIVE: usize = 10;

/// Default number of nearest neighbors removed from the pool by an extended canopy.
pub const DEFAULT_EXTENDED_CANOPY_EXCLUSIVE: usize = 1;

// ---- Clustering ----

/// Default similarity threshold; edges at or below it are ignored.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Default weight of the virtual sink edges in cut clustering.
pub const DEFAULT_CUT_ALPHA: f64 = 0.3;

/// Default inflation exponent of Markov clustering.
pub const DEFAULT_MCL_INFLATION: f64 = 2.0;

/// Default iteration cap of iterative clustering algorithms.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default convergence tolerance of Markov clustering.
pub const DEFAULT_MCL_EPSILON: f64 = 1e-5;

/// Largest component Markov clustering expands; its dense matrix holds
/// the square of this many entries.
pub const DEFAULT_MCL_MAX_COMPONENT_SIZE: usize = 4096;

/// Default attractor threshold of Markov clustering.
pub const DEFAULT_MCL_CLUSTER_THRESHOLD: f64 = 1e-3;

/// Degree term added to Ricochet vertex ranks so that, among vertices of
/// equal mean weight, the better connected one is picked first.
pub const RICOCHET_DEGREE_EPSILON: f64 = 1e-9;

/// Absolute slack when comparing a weight against a computed threshold.
pub const WEIGHT_TOLERANCE: f64 = 1e-12;

/// Tolerance used when comparing flow values.
pub const FLOW_EPSILON: f64 = 1e-12;
