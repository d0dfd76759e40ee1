//! Machine-readable parameter metadata.
//!
//! Every pruning and clustering strategy describes its tunable knobs with
//! `ParameterSpec`s so an external grid or random search can enumerate and
//! validate configurations without knowing algorithm internals.

use serde::Serialize;

use crate::errors::ConfigError;

/// The value domain of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    Integer,
    Float,
    Choice { options: Vec<&'static str> },
}

/// A concrete parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    /// Numeric view of the value, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

/// Description of one named parameter with default, bounds and step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParameterKind,
    pub default: ParameterValue,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl ParameterSpec {
    pub fn float(
        name: &'static str,
        description: &'static str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParameterKind::Float,
            default: ParameterValue::Float(default),
            min: Some(min),
            max: Some(max),
            step: Some(step),
        }
    }

    pub fn integer(
        name: &'static str,
        description: &'static str,
        default: i64,
        min: i64,
        max: i64,
        step: i64,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParameterKind::Integer,
            default: ParameterValue::Integer(default),
            min: Some(min as f64),
            max: Some(max as f64),
            step: Some(step as f64),
        }
    }

    pub fn choice(
        name: &'static str,
        description: &'static str,
        default: &'static str,
        options: Vec<&'static str>,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParameterKind::Choice { options },
            default: ParameterValue::Text(default.to_string()),
            min: None,
            max: None,
            step: None,
        }
    }

    /// Enumerate the candidate values from `min` to `max` by `step`.
    ///
    /// Choice parameters yield every option.
    pub fn grid(&self) -> Vec<ParameterValue> {
        match &self.kind {
            ParameterKind::Choice { options } => options
                .iter()
                .map(|o| ParameterValue::Text((*o).to_string()))
                .collect(),
            ParameterKind::Integer | ParameterKind::Float => {
                let (Some(min), Some(max), Some(step)) = (self.min, self.max, self.step) else {
                    return vec![self.default.clone()];
                };
                if step <= 0.0 || max < min {
                    return vec![self.default.clone()];
                }
                let steps = ((max - min) / step + 1e-9).floor() as usize;
                (0..=steps)
                    .map(|i| {
                        let v = min + step * i as f64;
                        match self.kind {
                            ParameterKind::Integer => ParameterValue::Integer(v.round() as i64),
                            _ => ParameterValue::Float(v),
                        }
                    })
                    .collect()
            }
        }
    }

    /// Check a value against the parameter's domain.
    pub fn validate(&self, value: &ParameterValue) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationFailed {
            field: self.name.to_string(),
            message,
        };
        match (&self.kind, value) {
            (ParameterKind::Choice { options }, ParameterValue::Text(text)) => {
                if options.iter().any(|o| o == text) {
                    Ok(())
                } else {
                    Err(invalid(format!("'{text}' is not one of {options:?}")))
                }
            }
            (ParameterKind::Choice { .. }, _) => Err(invalid("expected a text choice".into())),
            (_, ParameterValue::Text(_)) => Err(invalid("expected a number".into())),
            (ParameterKind::Integer, ParameterValue::Float(_)) => {
                Err(invalid("expected an integer".into()))
            }
            (_, numeric) => {
                let v = numeric.as_f64().unwrap_or(f64::NAN);
                if !v.is_finite() {
                    return Err(invalid("must be finite".into()));
                }
                if let Some(min) = self.min {
                    if v < min {
                        return Err(invalid(format!("{v} is below the minimum {min}")));
                    }
                }
                if let Some(max) = self.max {
                    if v > max {
                        return Err(invalid(format!("{v} is above the maximum {max}")));
                    }
                }
                Ok(())
            }
        }
    }
}

/// A strategy with a named parameter set.
pub trait Configurable {
    /// Stable strategy name, as used in configuration files.
    fn method_name(&self) -> &'static str;

    /// Parameter metadata, including the values currently in effect as defaults.
    fn parameters(&self) -> Vec<ParameterSpec>;

    /// JSON description of the strategy and its parameters.
    fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "method": self.method_name(),
            "parameters": self.parameters(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_grid() {
        let spec = ParameterSpec::float("alpha", "", 0.3, 0.1, 0.5, 0.1);
        let grid = spec.grid();
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], ParameterValue::Float(0.1));
        let last = grid[4].as_f64().unwrap();
        assert!((last - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_integer_grid() {
        let spec = ParameterSpec::integer("k", "", 2, 1, 10, 3);
        let values: Vec<_> = spec.grid().iter().filter_map(|v| v.as_f64()).collect();
        assert_eq!(values, vec![1.0, 4.0, 7.0, 10.0]);
    }

    #[test]
    fn test_validate_bounds() {
        let spec = ParameterSpec::float("alpha", "", 0.3, 0.0, 1.0, 0.05);
        assert!(spec.validate(&ParameterValue::Float(0.5)).is_ok());
        assert!(spec.validate(&ParameterValue::Float(1.5)).is_err());
        assert!(spec.validate(&ParameterValue::Float(f64::NAN)).is_err());
        assert!(spec.validate(&ParameterValue::Text("x".into())).is_err());
    }

    #[test]
    fn test_validate_choice() {
        let spec = ParameterSpec::choice("scheme", "", "js", vec!["cbs", "js"]);
        assert!(spec.validate(&ParameterValue::Text("cbs".into())).is_ok());
        assert!(spec.validate(&ParameterValue::Text("arcs".into())).is_err());
        assert_eq!(spec.grid().len(), 2);
    }

    #[test]
    fn test_spec_serializes() {
        let spec = ParameterSpec::integer("k", "top-k", 2, 1, 10, 1);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["name"], "k");
        assert_eq!(json["kind"]["type"], "integer");
        assert_eq!(json["default"], 2);
    }
}
