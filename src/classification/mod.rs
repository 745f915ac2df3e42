//! Condition classification - per-axis status levels, cross-axis reduction
//! and fleet-wide tallies.

mod aggregate;
mod classifier;

pub use aggregate::{fleet_summary, sensor_status, sensor_status_partial, FleetSummary};
pub use classifier::{classify, classify_checked, classify_reading};
