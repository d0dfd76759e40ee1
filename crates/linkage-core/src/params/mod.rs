//! Parameter metadata shared by every configurable strategy.

pub mod spec;

pub use spec::{Configurable, ParameterKind, ParameterSpec, ParameterValue};
