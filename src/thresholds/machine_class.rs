//! ISO 10816-3 machine classes and their velocity zone boundaries (mm/s RMS).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::types::ThresholdSet;

/// Machine class by size and mounting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum MachineClass {
    SmallMachine,
    MediumRigid,
    MediumFlexible,
    LargeRigid,
    LargeFlexible,
    IntegratedRigid,
    IntegratedFlexible,
    ExternalRigid,
    ExternalFlexible,
}

impl MachineClass {
    pub const ALL: [MachineClass; 9] = [
        MachineClass::SmallMachine,
        MachineClass::MediumRigid,
        MachineClass::MediumFlexible,
        MachineClass::LargeRigid,
        MachineClass::LargeFlexible,
        MachineClass::IntegratedRigid,
        MachineClass::IntegratedFlexible,
        MachineClass::ExternalRigid,
        MachineClass::ExternalFlexible,
    ];

    /// Catalog identifier
    pub fn id(self) -> &'static str {
        match self {
            MachineClass::SmallMachine => "smallMachine",
            MachineClass::MediumRigid => "mediumRigid",
            MachineClass::MediumFlexible => "mediumFlexible",
            MachineClass::LargeRigid => "largeRigid",
            MachineClass::LargeFlexible => "largeFlexible",
            MachineClass::IntegratedRigid => "integratedRigid",
            MachineClass::IntegratedFlexible => "integratedFlexible",
            MachineClass::ExternalRigid => "externalRigid",
            MachineClass::ExternalFlexible => "externalFlexible",
        }
    }

    /// Velocity zone boundaries: A/B, B/C, C/D
    pub fn velocity_thresholds(self) -> ThresholdSet {
        match self {
            MachineClass::SmallMachine => ThresholdSet::from_table(0.71, 1.80, 4.50),
            MachineClass::MediumRigid | MachineClass::IntegratedRigid => {
                ThresholdSet::from_table(1.40, 2.80, 4.50)
            }
            MachineClass::MediumFlexible
            | MachineClass::LargeRigid
            | MachineClass::IntegratedFlexible
            | MachineClass::ExternalRigid => ThresholdSet::from_table(2.30, 4.50, 7.10),
            MachineClass::LargeFlexible | MachineClass::ExternalFlexible => {
                ThresholdSet::from_table(3.50, 7.10, 11.0)
            }
        }
    }
}

impl std::fmt::Display for MachineClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for MachineClass {
    type Err = String;

    /// Accepts catalog ids case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MachineClass::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown machine class '{wanted}'"))
    }
}

/// Velocity catalog keyed by machine class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassTable {
    entries: BTreeMap<MachineClass, ThresholdSet>,
}

impl ClassTable {
    /// The nine-entry ISO 10816-3 catalog.
    pub fn iso_10816_3() -> Self {
        Self {
            entries: MachineClass::ALL
                .into_iter()
                .map(|c| (c, c.velocity_thresholds()))
                .collect(),
        }
    }

    /// Table with caller-supplied entries (classes not listed resolve to nothing).
    pub fn from_entries(entries: impl IntoIterator<Item = (MachineClass, ThresholdSet)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, class: MachineClass) -> Option<ThresholdSet> {
        self.entries.get(&class).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MachineClass, ThresholdSet)> + '_ {
        self.entries.iter().map(|(&c, &t)| (c, t))
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::iso_10816_3()
    }
}
