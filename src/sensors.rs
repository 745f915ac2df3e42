//! Sensor metadata and acquisition inputs in validated form.

use serde::Serialize;
use uuid::Uuid;

use crate::thresholds::{AxisPartials, MachineClass, MachineKey, PartialThreshold};
use crate::types::{Axis, AxisConfig, Connectivity, OperationalMode, RawAxisSample};

/// Everything the threshold resolver and aggregator need to know about a sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorProfile {
    pub sensor_id: String,
    pub machine_id: Option<Uuid>,
    pub machine_name: Option<MachineKey>,
    pub machine_class: Option<MachineClass>,
    /// `threshold_min/medium/max` and per-axis warning fields from the sensor record
    pub velocity_fields: AxisPartials,
    pub temperature_fields: PartialThreshold,
    pub connectivity: Connectivity,
    pub mode: OperationalMode,
}

impl SensorProfile {
    /// Online, running sensor with no machine linkage or threshold fields.
    pub fn new(sensor_id: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            machine_id: None,
            machine_name: None,
            machine_class: None,
            velocity_fields: AxisPartials::default(),
            temperature_fields: PartialThreshold::default(),
            connectivity: Connectivity::Online,
            mode: OperationalMode::Running,
        }
    }
}

/// Raw buffers for the three axes of one acquisition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriaxialSample {
    pub h: RawAxisSample,
    pub v: RawAxisSample,
    pub a: RawAxisSample,
}

impl TriaxialSample {
    pub fn new(h: Vec<i32>, v: Vec<i32>, a: Vec<i32>) -> Self {
        Self {
            h: RawAxisSample::new(Axis::H, h),
            v: RawAxisSample::new(Axis::V, v),
            a: RawAxisSample::new(Axis::A, a),
        }
    }

    pub fn axis(&self, axis: Axis) -> &RawAxisSample {
        match axis {
            Axis::H => &self.h,
            Axis::V => &self.v,
            Axis::A => &self.a,
        }
    }
}

/// One sensor's input for a refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorInput {
    pub profile: SensorProfile,
    pub calibration: AxisConfig,
    pub samples: TriaxialSample,
    /// Latest temperature reading (°C), if the sensor reports one
    pub temperature_c: Option<f64>,
}
