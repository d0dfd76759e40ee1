//! Closed sets of strategy selectors.
//!
//! Each family is a plain enum; the analysis crate maps every variant to
//! an implementation through its registration tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable configuration name.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == wanted)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        field: stringify!($name).to_string(),
                        message: format!("unknown value '{s}'"),
                    })
            }
        }
    };
}

named_enum!(
    /// Edge weighting scheme of the candidate graph.
    WeightingScheme {
        Cbs => "cbs",
        Ecbs => "ecbs",
        #[default]
        Js => "js",
        Ejs => "ejs",
        Arcs => "arcs",
        PearsonX2 => "pearson_x2",
    }
);

named_enum!(
    /// Meta-blocking strategy.
    PruningMethod {
        #[default]
        WeightedEdgePruning => "wep",
        CardinalityEdgePruning => "cep",
        WeightedNodePruning => "wnp",
        CardinalityNodePruning => "cnp",
        ReciprocalWeightedNodePruning => "rwnp",
        ReciprocalCardinalityNodePruning => "rcnp",
        ComparisonPropagation => "comparison_propagation",
        CanopyClustering => "canopy",
        ExtendedCanopyClustering => "extended_canopy",
    }
);

named_enum!(
    /// Entity clustering algorithm.
    ClusteringMethod {
        #[default]
        ConnectedComponents => "connected_components",
        UniqueMapping => "unique_mapping",
        RicochetSr => "ricochet_sr",
        Cut => "cut",
        Markov => "markov",
        Center => "center",
        MergeCenter => "merge_center",
        Correlation => "correlation",
    }
);
