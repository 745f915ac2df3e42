//! Vibration Engine - runs the full chain for one sensor or a whole fleet.
//!
//! ```text
//! raw ADC ─► analyze_axis ─► AxisStats ─┐
//!                                        ├─► classify ─► sensor_status ─► fleet_summary
//! overrides + fields + class ─► resolve ─┘
//! ```
//!
//! The engine holds only immutable configuration; every call is independent,
//! so sensors are assessed in parallel with no ordering between them.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::classification::{classify_reading, fleet_summary, sensor_status_partial, FleetSummary};
use crate::config::EngineConfig;
use crate::processing::{analyze_axis, AxisAnalysis};
use crate::sensors::{SensorInput, SensorProfile};
use crate::thresholds::{ClassTable, ResolvedThreshold, ThresholdOverride, ThresholdResolver};
use crate::types::{Axis, AxisConfig, Quantity, RawAxisSample, SensorStatus, StatusLevel};

/// Result for one axis of one sensor.
#[derive(Debug, Clone, Serialize)]
pub struct AxisAssessment {
    pub axis: Axis,
    pub analysis: AxisAnalysis,
    pub thresholds: Option<ResolvedThreshold>,
    /// `None` when the axis had no data or its thresholds could not be resolved
    pub status: Option<StatusLevel>,
    pub threshold_error: Option<String>,
}

/// Temperature reading classified beside the vibration status.
#[derive(Debug, Clone, Serialize)]
pub struct TemperatureAssessment {
    pub value_c: f64,
    pub thresholds: Option<ResolvedThreshold>,
    pub status: Option<StatusLevel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensorAssessment {
    pub sensor_id: String,
    pub axes: Vec<AxisAssessment>,
    pub status: SensorStatus,
    pub temperature: Option<TemperatureAssessment>,
}

impl SensorAssessment {
    pub fn axis(&self, axis: Axis) -> Option<&AxisAssessment> {
        self.axes.iter().find(|a| a.axis == axis)
    }

    /// Drop spectra, keeping stats and peaks.
    pub fn without_spectra(mut self) -> Self {
        for axis in &mut self.axes {
            axis.analysis.accel_spectrum = None;
            axis.analysis.velocity_spectrum = None;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetAssessment {
    pub sensors: Vec<SensorAssessment>,
    pub summary: FleetSummary,
}

/// Stateless analysis engine parameterised by an [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct VibrationEngine {
    config: EngineConfig,
    class_table: ClassTable,
}

impl VibrationEngine {
    /// Engine using the ISO 10816-3 class table.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            class_table: ClassTable::iso_10816_3(),
        }
    }

    pub fn with_class_table(mut self, class_table: ClassTable) -> Self {
        self.class_table = class_table;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn class_table(&self) -> &ClassTable {
        &self.class_table
    }

    pub fn resolver<'a>(&'a self, overrides: &'a [ThresholdOverride]) -> ThresholdResolver<'a> {
        ThresholdResolver::new(overrides, &self.class_table, &self.config.defaults)
    }

    pub fn analyze_axis(&self, sample: &RawAxisSample, calibration: &AxisConfig) -> AxisAnalysis {
        analyze_axis(sample, calibration, &self.config)
    }

    /// Resolve, classify and aggregate one sensor.
    pub fn assess_sensor(
        &self,
        input: &SensorInput,
        overrides: &[ThresholdOverride],
    ) -> SensorAssessment {
        let resolver = self.resolver(overrides);
        let profile = &input.profile;

        let axes: Vec<AxisAssessment> = Axis::ALL
            .into_iter()
            .map(|axis| {
                let analysis = self.analyze_axis(input.samples.axis(axis), &input.calibration);
                assess_axis(&resolver, profile, axis, analysis)
            })
            .collect();

        let statuses = [axes[0].status, axes[1].status, axes[2].status];
        let status = sensor_status_partial(statuses, profile.connectivity, profile.mode);

        let temperature = input
            .temperature_c
            .map(|value_c| assess_temperature(&resolver, profile, value_c));

        SensorAssessment {
            sensor_id: profile.sensor_id.clone(),
            axes,
            status,
            temperature,
        }
    }

    /// Assess every sensor in parallel and tally the fleet.
    pub fn assess_fleet(
        &self,
        inputs: &[SensorInput],
        overrides: &[ThresholdOverride],
    ) -> FleetAssessment {
        let sensors: Vec<SensorAssessment> = inputs
            .par_iter()
            .map(|input| self.assess_sensor(input, overrides))
            .collect();

        let summary = fleet_summary(sensors.iter().map(|s| &s.status));
        info!(
            sensors = summary.total(),
            normal = summary.normal,
            warning = summary.warning,
            concern = summary.concern,
            critical = summary.critical,
            standby = summary.standby,
            lost = summary.lost,
            "Fleet assessed"
        );

        FleetAssessment { sensors, summary }
    }
}

fn assess_axis(
    resolver: &ThresholdResolver<'_>,
    profile: &SensorProfile,
    axis: Axis,
    analysis: AxisAnalysis,
) -> AxisAssessment {
    match resolver.resolve(profile, Quantity::Velocity, axis) {
        Ok(resolved) => AxisAssessment {
            axis,
            status: classify_reading(analysis.stats.classification_value(), &resolved.set),
            thresholds: Some(resolved),
            threshold_error: None,
            analysis,
        },
        Err(e) => {
            warn!(sensor = %profile.sensor_id, %axis, error = %e, "Axis status unknown");
            AxisAssessment {
                axis,
                analysis,
                thresholds: None,
                status: None,
                threshold_error: Some(e.to_string()),
            }
        }
    }
}

fn assess_temperature(
    resolver: &ThresholdResolver<'_>,
    profile: &SensorProfile,
    value_c: f64,
) -> TemperatureAssessment {
    // Temperature has no per-axis thresholds; any axis resolves the same set
    match resolver.resolve(profile, Quantity::Temperature, Axis::H) {
        Ok(resolved) => TemperatureAssessment {
            value_c,
            status: classify_reading(Some(value_c), &resolved.set),
            thresholds: Some(resolved),
        },
        Err(e) => {
            warn!(sensor = %profile.sensor_id, error = %e, "Temperature status unknown");
            TemperatureAssessment {
                value_c,
                thresholds: None,
                status: None,
            }
        }
    }
}
