//! Boundary parsing: loosely typed JSON payloads → validated engine inputs.
//!
//! Upstream APIs send numbers as either JSON numbers or numeric strings,
//! machine ids that are not always UUIDs, and free-form machine names. All
//! of that is settled here, once, so the engine only ever sees typed values.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::sensors::{SensorInput, SensorProfile, TriaxialSample};
use crate::thresholds::{AxisPartials, MachineClass, MachineKey, PartialThreshold, ThresholdOverride};
use crate::types::{Axis, AxisConfig, Connectivity, OperationalMode, RawAxisSample};

/// Errors converting a raw payload record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    #[error("Invalid calibration: {field} = {value}")]
    InvalidCalibration { field: &'static str, value: f64 },

    #[error("Field '{field}' is not a number: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Field '{field}' has unsupported value '{value}'")]
    InvalidEnum { field: &'static str, value: String },

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("ADC sample {index} on axis {axis} out of range: {value}")]
    AdcOutOfRange { axis: Axis, index: usize, value: i64 },
}

// ============================================================================
// Raw payloads
// ============================================================================

/// Everything one refresh cycle hands to the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisBundle {
    #[serde(default)]
    pub sensors: Vec<RawSensorRecord>,
    #[serde(default)]
    pub overrides: Vec<RawOverrideRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAcquisition {
    #[serde(default)]
    pub h: Vec<i64>,
    #[serde(default)]
    pub v: Vec<i64>,
    #[serde(default)]
    pub a: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSensorRecord {
    #[serde(alias = "id")]
    pub sensor_id: String,
    #[serde(default)]
    pub machine_id: Option<Value>,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub machine_class: Option<String>,

    #[serde(default)]
    pub threshold_min: Option<Value>,
    #[serde(default)]
    pub threshold_medium: Option<Value>,
    #[serde(default)]
    pub threshold_max: Option<Value>,
    #[serde(default)]
    pub h_warning: Option<Value>,
    #[serde(default)]
    pub v_warning: Option<Value>,
    #[serde(default)]
    pub a_warning: Option<Value>,
    #[serde(default)]
    pub temperature_min: Option<Value>,
    #[serde(default)]
    pub temperature_medium: Option<Value>,
    #[serde(default)]
    pub temperature_max: Option<Value>,

    #[serde(default)]
    pub connectivity: Option<String>,
    #[serde(default)]
    pub operational_mode: Option<String>,

    #[serde(default)]
    pub g_scale: Option<Value>,
    #[serde(default)]
    pub fmax: Option<Value>,
    #[serde(default)]
    pub lor: Option<Value>,
    #[serde(default)]
    pub samples: RawAcquisition,
    #[serde(default)]
    pub temperature: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOverrideRecord {
    #[serde(default)]
    pub machine_id: Option<Value>,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub velocity_min: Option<Value>,
    #[serde(default)]
    pub velocity_medium: Option<Value>,
    #[serde(default)]
    pub velocity_max: Option<Value>,
    #[serde(default)]
    pub h_warning: Option<Value>,
    #[serde(default)]
    pub v_warning: Option<Value>,
    #[serde(default)]
    pub a_warning: Option<Value>,
    #[serde(default)]
    pub temperature_min: Option<Value>,
    #[serde(default)]
    pub temperature_medium: Option<Value>,
    #[serde(default)]
    pub temperature_max: Option<Value>,
}

// ============================================================================
// Field parsers
// ============================================================================

/// JSON number or numeric string; null and blank strings are absent.
pub fn parse_number(field: &'static str, value: Option<&Value>) -> Result<Option<f64>, IngestError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| IngestError::InvalidNumber {
            field,
            value: n.to_string(),
        }),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| IngestError::InvalidNumber {
                    field,
                    value: s.clone(),
                })
        }
        Some(other) => Err(IngestError::InvalidNumber {
            field,
            value: other.to_string(),
        }),
    }
}

/// Only well-formed UUIDs count as machine ids; anything else is absent.
pub fn parse_machine_id(value: Option<&Value>) -> Option<Uuid> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match Uuid::parse_str(s.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                debug!(machine_id = %s, "Ignoring non-UUID machine id");
                None
            }
        },
        Some(other) => {
            debug!(machine_id = %other, "Ignoring non-string machine id");
            None
        }
    }
}

fn parse_machine_class(value: Option<&str>) -> Option<MachineClass> {
    let raw = value.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(class) => Some(class),
        Err(e) => {
            warn!(error = %e, "Unknown machine class, falling back to defaults");
            None
        }
    }
}

fn parse_connectivity(value: Option<&str>) -> Result<Connectivity, IngestError> {
    match value.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "online" | "connected") => Ok(Connectivity::Online),
        Some("offline" | "disconnected" | "lost") => Ok(Connectivity::Offline),
        Some(other) => Err(IngestError::InvalidEnum {
            field: "connectivity",
            value: other.to_string(),
        }),
    }
}

fn parse_mode(value: Option<&str>) -> Result<OperationalMode, IngestError> {
    match value.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "running" | "active") => Ok(OperationalMode::Running),
        Some("standby" | "idle") => Ok(OperationalMode::Standby),
        Some(other) => Err(IngestError::InvalidEnum {
            field: "operational_mode",
            value: other.to_string(),
        }),
    }
}

fn parse_counts(axis: Axis, raw: &[i64]) -> Result<RawAxisSample, IngestError> {
    let counts = raw
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            i32::try_from(value).map_err(|_| IngestError::AdcOutOfRange { axis, index, value })
        })
        .collect::<Result<Vec<i32>, _>>()?;
    Ok(RawAxisSample::new(axis, counts))
}

fn partial(
    fields: [(&'static str, Option<&Value>); 3],
) -> Result<PartialThreshold, IngestError> {
    let [min, medium, max] = fields;
    Ok(PartialThreshold::new(
        parse_number(min.0, min.1)?,
        parse_number(medium.0, medium.1)?,
        parse_number(max.0, max.1)?,
    ))
}

/// `*_warning` fields are the per-axis start of the Warning band, i.e. `min`.
fn axis_warnings(
    all: PartialThreshold,
    h: Option<&Value>,
    v: Option<&Value>,
    a: Option<&Value>,
) -> Result<AxisPartials, IngestError> {
    let warning = |field: &'static str, value: Option<&Value>| -> Result<PartialThreshold, IngestError> {
        Ok(PartialThreshold::new(parse_number(field, value)?, None, None))
    };
    Ok(AxisPartials {
        all,
        h: warning("h_warning", h)?,
        v: warning("v_warning", v)?,
        a: warning("a_warning", a)?,
    })
}

// ============================================================================
// Validated construction
// ============================================================================

impl TryFrom<&RawOverrideRecord> for ThresholdOverride {
    type Error = IngestError;

    fn try_from(raw: &RawOverrideRecord) -> Result<Self, Self::Error> {
        let all = partial([
            ("velocity_min", raw.velocity_min.as_ref()),
            ("velocity_medium", raw.velocity_medium.as_ref()),
            ("velocity_max", raw.velocity_max.as_ref()),
        ])?;
        Ok(Self {
            machine_id: parse_machine_id(raw.machine_id.as_ref()),
            machine_name: raw.machine_name.as_deref().and_then(MachineKey::new),
            velocity: axis_warnings(
                all,
                raw.h_warning.as_ref(),
                raw.v_warning.as_ref(),
                raw.a_warning.as_ref(),
            )?,
            temperature: partial([
                ("temperature_min", raw.temperature_min.as_ref()),
                ("temperature_medium", raw.temperature_medium.as_ref()),
                ("temperature_max", raw.temperature_max.as_ref()),
            ])?,
        })
    }
}

impl TryFrom<&RawSensorRecord> for SensorInput {
    type Error = IngestError;

    fn try_from(raw: &RawSensorRecord) -> Result<Self, Self::Error> {
        let all = partial([
            ("threshold_min", raw.threshold_min.as_ref()),
            ("threshold_medium", raw.threshold_medium.as_ref()),
            ("threshold_max", raw.threshold_max.as_ref()),
        ])?;

        let profile = SensorProfile {
            sensor_id: raw.sensor_id.clone(),
            machine_id: parse_machine_id(raw.machine_id.as_ref()),
            machine_name: raw.machine_name.as_deref().and_then(MachineKey::new),
            machine_class: parse_machine_class(raw.machine_class.as_deref()),
            velocity_fields: axis_warnings(
                all,
                raw.h_warning.as_ref(),
                raw.v_warning.as_ref(),
                raw.a_warning.as_ref(),
            )?,
            temperature_fields: partial([
                ("temperature_min", raw.temperature_min.as_ref()),
                ("temperature_medium", raw.temperature_medium.as_ref()),
                ("temperature_max", raw.temperature_max.as_ref()),
            ])?,
            connectivity: parse_connectivity(raw.connectivity.as_deref())?,
            mode: parse_mode(raw.operational_mode.as_deref())?,
        };

        let samples = TriaxialSample {
            h: parse_counts(Axis::H, &raw.samples.h)?,
            v: parse_counts(Axis::V, &raw.samples.v)?,
            a: parse_counts(Axis::A, &raw.samples.a)?,
        };

        let g_scale =
            parse_number("g_scale", raw.g_scale.as_ref())?.ok_or(IngestError::MissingField("g_scale"))?;
        let fmax = parse_number("fmax", raw.fmax.as_ref())?.ok_or(IngestError::MissingField("fmax"))?;
        let longest = samples.h.len().max(samples.v.len()).max(samples.a.len());
        let lor = match parse_number("lor", raw.lor.as_ref())? {
            Some(l) if l.is_finite() && l >= 1.0 && l.fract() == 0.0 => l as usize,
            Some(l) => return Err(IngestError::InvalidCalibration { field: "lor", value: l }),
            None => longest.max(1),
        };
        let calibration = AxisConfig::new(g_scale, fmax, lor)?;

        Ok(Self {
            profile,
            calibration,
            samples,
            temperature_c: parse_number("temperature", raw.temperature.as_ref())?
                .filter(|t| t.is_finite()),
        })
    }
}

/// A record that was dropped during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestIssue {
    /// Sensor id, or `override[<index>]`
    pub record: String,
    pub error: IngestError,
}

/// Validated contents of an [`AnalysisBundle`].
#[derive(Debug, Clone, Default)]
pub struct IngestedBundle {
    pub inputs: Vec<SensorInput>,
    pub overrides: Vec<ThresholdOverride>,
    pub issues: Vec<IngestIssue>,
}

impl AnalysisBundle {
    /// Validate every record; invalid ones are skipped and reported.
    pub fn ingest(&self) -> IngestedBundle {
        let mut bundle = IngestedBundle::default();

        for (index, raw) in self.overrides.iter().enumerate() {
            match ThresholdOverride::try_from(raw) {
                Ok(o) => bundle.overrides.push(o),
                Err(error) => {
                    warn!(index, error = %error, "Skipping invalid threshold override");
                    bundle.issues.push(IngestIssue {
                        record: format!("override[{index}]"),
                        error,
                    });
                }
            }
        }

        for raw in &self.sensors {
            match SensorInput::try_from(raw) {
                Ok(input) => bundle.inputs.push(input),
                Err(error) => {
                    warn!(sensor = %raw.sensor_id, error = %error, "Skipping invalid sensor record");
                    bundle.issues.push(IngestIssue {
                        record: raw.sensor_id.clone(),
                        error,
                    });
                }
            }
        }

        bundle
    }
}
