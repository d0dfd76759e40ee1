//! Top-level Linkage configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ClusteringConfig, MetablockingConfig};
use crate::constants::{CONFIG_FILE_NAME, ENV_PREFIX};
use crate::errors::ConfigError;
use crate::types::{ClusteringMethod, PruningMethod, WeightingScheme};

/// Top-level configuration aggregating the stage configs.
///
/// Resolution order (highest priority first):
/// 1. Caller overrides (applied via `apply_overrides`)
/// 2. Environment variables (`LINKAGE_*`)
/// 3. Project config (`linkage.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LinkageConfig {
    pub metablocking: MetablockingConfig,
    pub clustering: ClusteringConfig,
}

/// Programmatic overrides, typically filled from command line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub pruning_method: Option<PruningMethod>,
    pub weighting_scheme: Option<WeightingScheme>,
    pub clustering_method: Option<ClusteringMethod>,
    pub similarity_threshold: Option<f64>,
    pub threads: Option<usize>,
}

impl LinkageConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &LinkageConfig) -> Result<(), ConfigError> {
        let m = &config.metablocking;
        let c = &config.clustering;

        check_finite("metablocking.filter_ratio", m.filter_ratio)?;
        check_unit("metablocking.inclusive_threshold", m.inclusive_threshold)?;
        check_unit("metablocking.exclusive_threshold", m.exclusive_threshold)?;
        if m.effective_exclusive_threshold() < m.effective_inclusive_threshold() {
            return Err(ConfigError::ValidationFailed {
                field: "metablocking.exclusive_threshold".to_string(),
                message: "must not be below inclusive_threshold".to_string(),
            });
        }
        if m.effective_exclusive_cardinality() > m.effective_inclusive_cardinality() {
            return Err(ConfigError::ValidationFailed {
                field: "metablocking.exclusive_cardinality".to_string(),
                message: "must not exceed inclusive_cardinality".to_string(),
            });
        }
        check_positive_count("metablocking.cardinality", m.cardinality)?;
        check_positive_count("metablocking.inclusive_cardinality", m.inclusive_cardinality)?;
        if m.max_comparisons == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "metablocking.max_comparisons".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        check_finite("clustering.similarity_threshold", c.similarity_threshold)?;
        check_finite("clustering.threshold_stddev_k", c.threshold_stddev_k)?;
        if let Some(alpha) = c.alpha {
            if !alpha.is_finite() || alpha <= 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "clustering.alpha".to_string(),
                    message: "must be a positive number".to_string(),
                });
            }
        }
        if let Some(inflation) = c.inflation {
            if !inflation.is_finite() || inflation <= 1.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "clustering.inflation".to_string(),
                    message: "must be greater than 1.0".to_string(),
                });
            }
        }
        check_positive_count("clustering.max_iterations", c.max_iterations)?;
        if let Some(epsilon) = c.epsilon {
            if !epsilon.is_finite() || epsilon <= 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "clustering.epsilon".to_string(),
                    message: "must be a positive number".to_string(),
                });
            }
        }
        check_unit("clustering.cluster_threshold", c.cluster_threshold)?;
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut LinkageConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: LinkageConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a `Some` value.
    pub fn merge(base: &mut LinkageConfig, other: &LinkageConfig) {
        let (b, o) = (&mut base.metablocking, &other.metablocking);
        if o.method.is_some() {
            b.method = o.method;
        }
        if o.weighting_scheme.is_some() {
            b.weighting_scheme = o.weighting_scheme;
        }
        if o.filter_ratio.is_some() {
            b.filter_ratio = o.filter_ratio;
        }
        if o.cardinality.is_some() {
            b.cardinality = o.cardinality;
        }
        if o.inclusive_threshold.is_some() {
            b.inclusive_threshold = o.inclusive_threshold;
        }
        if o.exclusive_threshold.is_some() {
            b.exclusive_threshold = o.exclusive_threshold;
        }
        if o.inclusive_cardinality.is_some() {
            b.inclusive_cardinality = o.inclusive_cardinality;
        }
        if o.exclusive_cardinality.is_some() {
            b.exclusive_cardinality = o.exclusive_cardinality;
        }
        if o.max_comparisons.is_some() {
            b.max_comparisons = o.max_comparisons;
        }
        if o.threads.is_some() {
            b.threads = o.threads;
        }

        let (b, o) = (&mut base.clustering, &other.clustering);
        if o.method.is_some() {
            b.method = o.method;
        }
        if o.similarity_threshold.is_some() {
            b.similarity_threshold = o.similarity_threshold;
        }
        if o.threshold_stddev_k.is_some() {
            b.threshold_stddev_k = o.threshold_stddev_k;
        }
        if o.alpha.is_some() {
            b.alpha = o.alpha;
        }
        if o.inflation.is_some() {
            b.inflation = o.inflation;
        }
        if o.max_iterations.is_some() {
            b.max_iterations = o.max_iterations;
        }
        if o.epsilon.is_some() {
            b.epsilon = o.epsilon;
        }
        if o.cluster_threshold.is_some() {
            b.cluster_threshold = o.cluster_threshold;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `LINKAGE_<SECTION>_<FIELD>`, e.g. `LINKAGE_METABLOCKING_METHOD`
    /// or `LINKAGE_CLUSTERING_ALPHA`. `LINKAGE_CLUSTERING_THRESHOLD` sets
    /// `similarity_threshold`. Values that fail to parse are ignored.
    fn apply_env_overrides(config: &mut LinkageConfig) {
        let m = &mut config.metablocking;
        env_override("METABLOCKING_METHOD", &mut m.method);
        env_override("METABLOCKING_WEIGHTING_SCHEME", &mut m.weighting_scheme);
        env_override("METABLOCKING_FILTER_RATIO", &mut m.filter_ratio);
        env_override("METABLOCKING_CARDINALITY", &mut m.cardinality);
        env_override("METABLOCKING_INCLUSIVE_THRESHOLD", &mut m.inclusive_threshold);
        env_override("METABLOCKING_EXCLUSIVE_THRESHOLD", &mut m.exclusive_threshold);
        env_override(
            "METABLOCKING_INCLUSIVE_CARDINALITY",
            &mut m.inclusive_cardinality,
        );
        env_override(
            "METABLOCKING_EXCLUSIVE_CARDINALITY",
            &mut m.exclusive_cardinality,
        );
        env_override("METABLOCKING_MAX_COMPARISONS", &mut m.max_comparisons);
        env_override("METABLOCKING_THREADS", &mut m.threads);

        let c = &mut config.clustering;
        env_override("CLUSTERING_METHOD", &mut c.method);
        env_override("CLUSTERING_THRESHOLD", &mut c.similarity_threshold);
        env_override("CLUSTERING_STDDEV_K", &mut c.threshold_stddev_k);
        env_override("CLUSTERING_ALPHA", &mut c.alpha);
        env_override("CLUSTERING_INFLATION", &mut c.inflation);
        env_override("CLUSTERING_MAX_ITERATIONS", &mut c.max_iterations);
        env_override("CLUSTERING_EPSILON", &mut c.epsilon);
        env_override("CLUSTERING_CLUSTER_THRESHOLD", &mut c.cluster_threshold);
    }

    /// Apply caller overrides (highest priority).
    pub fn apply_overrides(config: &mut LinkageConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.pruning_method {
            config.metablocking.method = Some(v);
        }
        if let Some(v) = overrides.weighting_scheme {
            config.metablocking.weighting_scheme = Some(v);
        }
        if let Some(v) = overrides.threads {
            config.metablocking.threads = Some(v);
        }
        if let Some(v) = overrides.clustering_method {
            config.clustering.method = Some(v);
        }
        if let Some(v) = overrides.similarity_threshold {
            config.clustering.similarity_threshold = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_override<T: FromStr>(key: &str, slot: &mut Option<T>) {
    let var = format!("{ENV_PREFIX}{key}");
    if let Ok(val) = std::env::var(&var) {
        match val.parse::<T>() {
            Ok(v) => *slot = Some(v),
            Err(_) => {
                tracing::warn!(var = %var, value = %val, "ignoring unparsable environment override")
            }
        }
    }
}

fn check_finite(field: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !v.is_finite() => Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be finite".to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_unit(field: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be between 0.0 and 1.0".to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_positive_count(field: &str, value: Option<usize>) -> Result<(), ConfigError> {
    match value {
        Some(0) => Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be greater than 0".to_string(),
        }),
        _ => Ok(()),
    }
}
