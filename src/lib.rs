//! Vibration Health: signal analysis and condition classification
//!
//! Turns raw triaxial accelerometer ADC buffers into spectral statistics and
//! ISO 10816-3 style machine-health statuses.
//!
//! ## Architecture
//!
//! - **Processing**: ADC → g → mm/s² → mm/s, windowed FFT, top-N peak extraction
//! - **Thresholds**: ISO class table, sensor fields and per-machine overrides
//!   merged per boundary through an ordered provider chain
//! - **Classification**: per-axis status levels, worst-axis sensor status, fleet tallies
//! - **Ingest**: validated construction of engine inputs from loosely typed payloads
//! - **Engine**: the full chain for one sensor or a fleet

pub mod classification;
pub mod config;
pub mod engine;
pub mod ingest;
pub mod processing;
pub mod sensors;
pub mod thresholds;
pub mod types;

// Re-export configuration
pub use config::EngineConfig;

// Re-export commonly used types
pub use types::{
    Axis, AxisConfig, AxisStats, Connectivity, OperationalMode, PeakStat, Quantity,
    RawAxisSample, SensorStatus, SpectrumPoint, StatusLevel, ThresholdSet,
};

// Re-export the engine surface
pub use classification::{classify, fleet_summary, sensor_status, FleetSummary};
pub use engine::{FleetAssessment, SensorAssessment, VibrationEngine};
pub use sensors::{SensorInput, SensorProfile, TriaxialSample};
pub use thresholds::{
    ClassTable, MachineClass, ThresholdError, ThresholdOverride, ThresholdResolver,
    ThresholdSource,
};
