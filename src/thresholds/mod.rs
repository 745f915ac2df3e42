//! Threshold resolution - ISO 10816-3 class table, per-machine overrides and
//! sensor fields merged into one effective threshold set per quantity and axis.
//!
//! ## Precedence (per boundary)
//!
//! 1. Override matched by machine id (valid UUIDs only)
//! 2. Override matched by machine name (trimmed, case-insensitive)
//! 3. Threshold fields carried on the sensor record
//! 4. ISO 10816-3 class table (velocity only)
//! 5. Configured system defaults
//!
//! A partial source only fills the boundaries it specifies. Zero, negative
//! and non-finite values count as unspecified.

mod machine_class;
mod overrides;
mod resolver;

pub use machine_class::{ClassTable, MachineClass};
pub use overrides::{
    select_override, AxisPartials, MachineKey, MatchKind, MatchedOverride, PartialThreshold,
    ThresholdOverride,
};
pub use resolver::{
    Boundary, BoundarySources, ResolvedThreshold, ThresholdProvider, ThresholdResolver,
    ThresholdSource,
};

use thiserror::Error;

/// Errors building or resolving a threshold set
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("{boundary} boundary is not finite ({value})")]
    NonFiniteBoundary { boundary: &'static str, value: f64 },

    #[error("{boundary} boundary must be > 0 (got {value})")]
    NonPositiveBoundary { boundary: &'static str, value: f64 },

    #[error("thresholds out of order: min {min}, medium {medium}, max {max}")]
    InvalidThresholdOrder { min: f64, medium: f64, max: f64 },

    #[error("no source supplied the {boundary} boundary")]
    MissingBoundary { boundary: &'static str },
}
