//! Ordered provider chain that turns all threshold sources into one
//! [`ThresholdSet`] per quantity and axis.
//!
//! Resolution is recomputed on every call; nothing is cached here.

use serde::Serialize;
use tracing::{debug, warn};

use super::{
    select_override, ClassTable, MatchKind, MatchedOverride, PartialThreshold, ThresholdError,
    ThresholdOverride,
};
use crate::config::DefaultThresholds;
use crate::sensors::SensorProfile;
use crate::types::{Axis, Quantity, ThresholdSet};

/// One of the three boundaries of a threshold set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Min,
    Medium,
    Max,
}

impl Boundary {
    pub const ALL: [Boundary; 3] = [Boundary::Min, Boundary::Medium, Boundary::Max];

    fn name(self) -> &'static str {
        match self {
            Boundary::Min => "min",
            Boundary::Medium => "medium",
            Boundary::Max => "max",
        }
    }

    fn pick(self, partial: &PartialThreshold) -> Option<f64> {
        match self {
            Boundary::Min => partial.min,
            Boundary::Medium => partial.medium,
            Boundary::Max => partial.max,
        }
    }
}

/// Where a resolved boundary came from, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    MachineIdOverride,
    MachineNameOverride,
    SensorFields,
    MachineClass,
    SystemDefault,
}

impl std::fmt::Display for ThresholdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdSource::MachineIdOverride => write!(f, "machine-id override"),
            ThresholdSource::MachineNameOverride => write!(f, "machine-name override"),
            ThresholdSource::SensorFields => write!(f, "sensor fields"),
            ThresholdSource::MachineClass => write!(f, "machine class"),
            ThresholdSource::SystemDefault => write!(f, "system default"),
        }
    }
}

/// A source of partial thresholds, queried in precedence order.
pub trait ThresholdProvider {
    fn source(&self) -> ThresholdSource;

    /// Boundaries this source specifies for `quantity` on `axis`.
    fn partial(&self, quantity: Quantity, axis: Axis) -> PartialThreshold;
}

struct OverrideProvider<'a>(MatchedOverride<'a>);

impl ThresholdProvider for OverrideProvider<'_> {
    fn source(&self) -> ThresholdSource {
        match self.0.kind {
            MatchKind::MachineId => ThresholdSource::MachineIdOverride,
            MatchKind::MachineName => ThresholdSource::MachineNameOverride,
        }
    }

    fn partial(&self, quantity: Quantity, axis: Axis) -> PartialThreshold {
        match quantity {
            Quantity::Velocity => self.0.record.velocity.for_axis(axis),
            Quantity::Temperature => self.0.record.temperature,
        }
    }
}

struct SensorFieldsProvider<'a>(&'a SensorProfile);

impl ThresholdProvider for SensorFieldsProvider<'_> {
    fn source(&self) -> ThresholdSource {
        ThresholdSource::SensorFields
    }

    fn partial(&self, quantity: Quantity, axis: Axis) -> PartialThreshold {
        match quantity {
            Quantity::Velocity => self.0.velocity_fields.for_axis(axis),
            Quantity::Temperature => self.0.temperature_fields,
        }
    }
}

struct ClassProvider(Option<ThresholdSet>);

impl ThresholdProvider for ClassProvider {
    fn source(&self) -> ThresholdSource {
        ThresholdSource::MachineClass
    }

    fn partial(&self, quantity: Quantity, _axis: Axis) -> PartialThreshold {
        match (quantity, self.0) {
            (Quantity::Velocity, Some(set)) => {
                PartialThreshold::full(set.min(), set.medium(), set.max())
            }
            _ => PartialThreshold::default(),
        }
    }
}

struct DefaultProvider<'a>(&'a DefaultThresholds);

impl ThresholdProvider for DefaultProvider<'_> {
    fn source(&self) -> ThresholdSource {
        ThresholdSource::SystemDefault
    }

    fn partial(&self, quantity: Quantity, _axis: Axis) -> PartialThreshold {
        let b = self.0.for_quantity(quantity);
        PartialThreshold::full(b.min, b.medium, b.max)
    }
}

/// Provider that supplied each boundary of a resolved set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundarySources {
    pub min: ThresholdSource,
    pub medium: ThresholdSource,
    pub max: ThresholdSource,
}

/// Effective threshold for one quantity on one axis of one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedThreshold {
    pub quantity: Quantity,
    pub axis: Axis,
    pub set: ThresholdSet,
    pub sources: BoundarySources,
}

/// Resolves effective thresholds from overrides, sensor fields, the class
/// table and configured defaults.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdResolver<'a> {
    overrides: &'a [ThresholdOverride],
    class_table: &'a ClassTable,
    defaults: &'a DefaultThresholds,
}

impl<'a> ThresholdResolver<'a> {
    pub fn new(
        overrides: &'a [ThresholdOverride],
        class_table: &'a ClassTable,
        defaults: &'a DefaultThresholds,
    ) -> Self {
        Self {
            overrides,
            class_table,
            defaults,
        }
    }

    /// Providers for `sensor`, highest precedence first.
    ///
    /// At most one override is active: a machine-id match pre-empts any
    /// machine-name match.
    fn providers<'s>(&'s self, sensor: &'s SensorProfile) -> Vec<Box<dyn ThresholdProvider + 's>> {
        let mut providers: Vec<Box<dyn ThresholdProvider + 's>> = Vec::with_capacity(4);
        if let Some(matched) = select_override(sensor, self.overrides) {
            providers.push(Box::new(OverrideProvider(matched)));
        }
        providers.push(Box::new(SensorFieldsProvider(sensor)));
        providers.push(Box::new(ClassProvider(
            sensor.machine_class.and_then(|c| self.class_table.get(c)),
        )));
        providers.push(Box::new(DefaultProvider(self.defaults)));
        providers
    }

    /// Resolve the effective set for `quantity` on `axis`.
    ///
    /// Each boundary is taken from the first provider holding a usable value
    /// (finite and > 0). The merged set must be ascending.
    ///
    /// # Errors
    ///
    /// - [`ThresholdError::InvalidThresholdOrder`] when the merged boundaries are inverted
    /// - [`ThresholdError::MissingBoundary`] when even the defaults lack a usable value
    pub fn resolve(
        &self,
        sensor: &SensorProfile,
        quantity: Quantity,
        axis: Axis,
    ) -> Result<ResolvedThreshold, ThresholdError> {
        let providers = self.providers(sensor);
        let mut values = [0.0_f64; 3];
        let mut sources = [ThresholdSource::SystemDefault; 3];

        for (slot, boundary) in Boundary::ALL.into_iter().enumerate() {
            let found = providers.iter().find_map(|p| {
                let value = boundary.pick(&p.partial(quantity, axis))?;
                if value.is_finite() && value > 0.0 {
                    Some((value, p.source()))
                } else {
                    warn!(
                        sensor = %sensor.sensor_id,
                        %quantity,
                        %axis,
                        boundary = boundary.name(),
                        value,
                        source = %p.source(),
                        "Ignoring unusable threshold boundary"
                    );
                    None
                }
            });
            let (value, source) = found.ok_or(ThresholdError::MissingBoundary {
                boundary: boundary.name(),
            })?;
            values[slot] = value;
            sources[slot] = source;
        }

        let set = ThresholdSet::new(values[0], values[1], values[2]).inspect_err(|e| {
            warn!(sensor = %sensor.sensor_id, %quantity, %axis, error = %e, "Resolved thresholds rejected");
        })?;
        let sources = BoundarySources {
            min: sources[0],
            medium: sources[1],
            max: sources[2],
        };

        debug!(
            sensor = %sensor.sensor_id,
            %quantity,
            %axis,
            min = set.min(),
            medium = set.medium(),
            max = set.max(),
            ?sources,
            "Thresholds resolved"
        );

        Ok(ResolvedThreshold {
            quantity,
            axis,
            set,
            sources,
        })
    }
}
