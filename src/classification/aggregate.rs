//! Cross-axis status reduction and fleet tallies.

use serde::Serialize;

use crate::types::{Connectivity, OperationalMode, SensorStatus, StatusLevel};

/// Combine three axis statuses into the sensor status.
///
/// Offline pre-empts everything, then standby; otherwise the worst axis wins.
pub fn sensor_status(
    h: StatusLevel,
    v: StatusLevel,
    a: StatusLevel,
    connectivity: Connectivity,
    mode: OperationalMode,
) -> SensorStatus {
    sensor_status_partial([Some(h), Some(v), Some(a)], connectivity, mode)
}

/// [`sensor_status`] for axes that may be unknown (no data or unresolvable
/// thresholds).
///
/// Unknown axes are skipped; a sensor with no known axis is `Standby`.
pub fn sensor_status_partial(
    axes: [Option<StatusLevel>; 3],
    connectivity: Connectivity,
    mode: OperationalMode,
) -> SensorStatus {
    if connectivity == Connectivity::Offline {
        return SensorStatus::Lost;
    }
    if mode == OperationalMode::Standby {
        return SensorStatus::Standby;
    }
    axes.into_iter()
        .flatten()
        .max()
        .map_or(SensorStatus::Standby, SensorStatus::Level)
}

/// Mutually exclusive counts per status, rebuilt from scratch on every refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub normal: usize,
    pub warning: usize,
    pub concern: usize,
    pub critical: usize,
    pub standby: usize,
    pub lost: usize,
}

impl FleetSummary {
    pub fn total(&self) -> usize {
        self.normal + self.warning + self.concern + self.critical + self.standby + self.lost
    }

    pub fn count(&self, status: SensorStatus) -> usize {
        match status {
            SensorStatus::Level(StatusLevel::Normal) => self.normal,
            SensorStatus::Level(StatusLevel::Warning) => self.warning,
            SensorStatus::Level(StatusLevel::Concern) => self.concern,
            SensorStatus::Level(StatusLevel::Critical) => self.critical,
            SensorStatus::Standby => self.standby,
            SensorStatus::Lost => self.lost,
        }
    }

    fn record(&mut self, status: SensorStatus) {
        let bucket = match status {
            SensorStatus::Level(StatusLevel::Normal) => &mut self.normal,
            SensorStatus::Level(StatusLevel::Warning) => &mut self.warning,
            SensorStatus::Level(StatusLevel::Concern) => &mut self.concern,
            SensorStatus::Level(StatusLevel::Critical) => &mut self.critical,
            SensorStatus::Standby => &mut self.standby,
            SensorStatus::Lost => &mut self.lost,
        };
        *bucket += 1;
    }
}

/// Tally sensor statuses in one pass.
pub fn fleet_summary<'a>(statuses: impl IntoIterator<Item = &'a SensorStatus>) -> FleetSummary {
    statuses
        .into_iter()
        .fold(FleetSummary::default(), |mut summary, &status| {
            summary.record(status);
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONLINE: Connectivity = Connectivity::Online;
    const RUNNING: OperationalMode = OperationalMode::Running;

    #[test]
    fn test_worst_axis_wins() {
        let status = sensor_status(
            StatusLevel::Warning,
            StatusLevel::Normal,
            StatusLevel::Critical,
            ONLINE,
            RUNNING,
        );
        assert_eq!(status, SensorStatus::Level(StatusLevel::Critical));
    }

    #[test]
    fn test_offline_preempts_critical() {
        let status = sensor_status(
            StatusLevel::Critical,
            StatusLevel::Normal,
            StatusLevel::Normal,
            Connectivity::Offline,
            RUNNING,
        );
        assert_eq!(status, SensorStatus::Lost);

        let status = sensor_status(
            StatusLevel::Critical,
            StatusLevel::Critical,
            StatusLevel::Critical,
            Connectivity::Offline,
            OperationalMode::Standby,
        );
        assert_eq!(status, SensorStatus::Lost);
    }

    #[test]
    fn test_standby_preempts_levels() {
        let status = sensor_status(
            StatusLevel::Concern,
            StatusLevel::Normal,
            StatusLevel::Normal,
            ONLINE,
            OperationalMode::Standby,
        );
        assert_eq!(status, SensorStatus::Standby);
    }

    #[test]
    fn test_unknown_axes() {
        assert_eq!(
            sensor_status_partial([None, None, None], ONLINE, RUNNING),
            SensorStatus::Standby
        );
        assert_eq!(
            sensor_status_partial([None, Some(StatusLevel::Warning), None], ONLINE, RUNNING),
            SensorStatus::Level(StatusLevel::Warning)
        );
    }

    #[test]
    fn test_fleet_summary_counts() {
        let statuses = vec![
            SensorStatus::Level(StatusLevel::Normal),
            SensorStatus::Level(StatusLevel::Normal),
            SensorStatus::Level(StatusLevel::Critical),
            SensorStatus::Standby,
            SensorStatus::Lost,
            SensorStatus::Level(StatusLevel::Concern),
        ];
        let summary = fleet_summary(&statuses);
        assert_eq!(summary.normal, 2);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.concern, 1);
        assert_eq!(summary.warning, 0);
        assert_eq!(summary.count(SensorStatus::Lost), 1);
        assert_eq!(summary.total(), statuses.len());
    }

    #[test]
    fn test_empty_fleet() {
        let summary = fleet_summary(&[]);
        assert_eq!(summary, FleetSummary::default());
        assert_eq!(summary.total(), 0);
    }
}
