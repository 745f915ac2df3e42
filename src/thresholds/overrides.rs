//! Per-machine threshold overrides and how one is picked for a sensor.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::sensors::SensorProfile;
use crate::types::Axis;

/// Normalized machine name used for override matching.
///
/// Names are trimmed and compared case-insensitively everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MachineKey(String);

impl MachineKey {
    /// `None` when the name is blank.
    pub fn new(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MachineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Zero or more of min/medium/max.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PartialThreshold {
    pub min: Option<f64>,
    pub medium: Option<f64>,
    pub max: Option<f64>,
}

impl PartialThreshold {
    pub fn new(min: Option<f64>, medium: Option<f64>, max: Option<f64>) -> Self {
        Self { min, medium, max }
    }

    pub fn full(min: f64, medium: f64, max: f64) -> Self {
        Self::new(Some(min), Some(medium), Some(max))
    }

    /// Fields of `self`, falling back to `lower` where `self` has none.
    pub fn or(self, lower: Self) -> Self {
        Self {
            min: self.min.or(lower.min),
            medium: self.medium.or(lower.medium),
            max: self.max.or(lower.max),
        }
    }

    /// Drops boundaries that are zero, negative or non-finite.
    pub fn usable(self) -> Self {
        let keep = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0);
        Self {
            min: keep(self.min),
            medium: keep(self.medium),
            max: keep(self.max),
        }
    }
}

/// Velocity partials for all axes plus per-axis refinements.
///
/// Per-axis values win over `all` within the same source.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AxisPartials {
    pub all: PartialThreshold,
    pub h: PartialThreshold,
    pub v: PartialThreshold,
    pub a: PartialThreshold,
}

impl AxisPartials {
    pub fn uniform(all: PartialThreshold) -> Self {
        Self {
            all,
            ..Self::default()
        }
    }

    /// Effective partial for `axis`. An unusable per-axis boundary falls
    /// back to this source's `all` value.
    pub fn for_axis(&self, axis: Axis) -> PartialThreshold {
        let specific = match axis {
            Axis::H => self.h,
            Axis::V => self.v,
            Axis::A => self.a,
        };
        specific.usable().or(self.all)
    }
}

/// Organization-scoped override for one machine.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ThresholdOverride {
    /// Only valid UUIDs survive ingestion; anything else is `None`
    pub machine_id: Option<Uuid>,
    pub machine_name: Option<MachineKey>,
    pub velocity: AxisPartials,
    pub temperature: PartialThreshold,
}

/// How an override was matched to a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    MachineId,
    MachineName,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedOverride<'a> {
    pub record: &'a ThresholdOverride,
    pub kind: MatchKind,
}

/// Pick the single override that applies to `sensor`.
///
/// The first record whose machine id equals the sensor's wins; failing that,
/// the first record whose normalized name equals the sensor's.
pub fn select_override<'a>(
    sensor: &SensorProfile,
    overrides: &'a [ThresholdOverride],
) -> Option<MatchedOverride<'a>> {
    if let Some(id) = sensor.machine_id {
        if let Some(record) = overrides.iter().find(|o| o.machine_id == Some(id)) {
            debug!(sensor = %sensor.sensor_id, machine_id = %id, "Override matched by machine id");
            return Some(MatchedOverride {
                record,
                kind: MatchKind::MachineId,
            });
        }
    }

    let name = sensor.machine_name.as_ref()?;
    let record = overrides
        .iter()
        .find(|o| o.machine_name.as_ref() == Some(name))?;
    debug!(sensor = %sensor.sensor_id, machine_name = %name, "Override matched by machine name");
    Some(MatchedOverride {
        record,
        kind: MatchKind::MachineName,
    })
}
