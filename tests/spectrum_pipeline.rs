//! Spectrum Pipeline Integration
//!
//! Raw ADC counts through unit conversion, FFT, peak search and the engine,
//! including ingestion of a JSON bundle.

use serde_json::json;
use std::f64::consts::PI;

use vibration_health::engine::{FleetAssessment, SensorAssessment, VibrationEngine};
use vibration_health::ingest::{AnalysisBundle, IngestError};
use vibration_health::processing::{compute_spectrum, find_top_peaks};
use vibration_health::{
    Axis, AxisConfig, EngineConfig, RawAxisSample, SensorStatus, StatusLevel,
};

const SAMPLE_RATE: f64 = 2560.0;
const LINES: usize = 1024;

fn tone_counts(freq: f64, amplitude_counts: f64) -> Vec<i32> {
    (0..LINES)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            (amplitude_counts * (2.0 * PI * freq * t).sin()).round() as i32
        })
        .collect()
}

// ============================================================================
// Spectrum
// ============================================================================

#[test]
fn sinusoid_peak_lands_within_one_bin() {
    let signal: Vec<f64> = (0..LINES)
        .map(|i| (2.0 * PI * 237.0 * i as f64 / SAMPLE_RATE).sin())
        .collect();
    let spectrum = compute_spectrum(&signal, SAMPLE_RATE).expect("spectrum");
    let peaks = find_top_peaks(&spectrum.magnitudes, &spectrum.frequencies, 3);

    let top = peaks.top().expect("one peak");
    assert!(
        (top.frequency - 237.0).abs() <= spectrum.resolution(),
        "peak at {} Hz",
        top.frequency
    );
    assert_eq!(spectrum.len(), LINES / 2);
}

#[test]
fn acceleration_scales_linearly_with_g_scale() {
    let engine = VibrationEngine::new(EngineConfig::default());
    let sample = RawAxisSample::new(Axis::H, tone_counts(100.0, 800.0));

    let at = |g_scale: f64| {
        let calibration = AxisConfig::new(g_scale, 1000.0, LINES).expect("calibration");
        engine.analyze_axis(&sample, &calibration).stats
    };
    let base = at(2.0);
    let doubled = at(4.0);

    let ratio = doubled.accel_top_peak / base.accel_top_peak;
    assert!((ratio - 2.0).abs() < 1e-9, "ratio {ratio}");
    let ratio = doubled.velocity_top_peak / base.velocity_top_peak;
    assert!((ratio - 2.0).abs() < 1e-9, "velocity ratio {ratio}");
}

// ============================================================================
// End to end
// ============================================================================

fn bundle() -> AnalysisBundle {
    let tone = tone_counts(100.0, 1000.0);
    serde_json::from_value(json!({
        "sensors": [
            {
                "sensor_id": "pump-de",
                "machine_class": "mediumFlexible",
                "g_scale": "2",
                "fmax": 1000,
                "lor": 1024,
                "samples": { "h": tone, "v": tone, "a": tone },
                "temperature": 41.0
            },
            {
                "id": "fan-nde",
                "machine_class": "mediumFlexible",
                "connectivity": "offline",
                "g_scale": 2,
                "fmax": 1000,
                "samples": { "h": tone }
            },
            {
                "sensor_id": "idle-motor",
                "g_scale": 2,
                "fmax": 1000,
                "samples": {}
            },
            {
                "sensor_id": "uncalibrated",
                "fmax": 1000,
                "samples": { "h": tone }
            }
        ],
        "overrides": [
            { "machine_name": "Spare", "velocity_max": "not-a-number" }
        ]
    }))
    .expect("bundle deserializes")
}

#[test]
fn ingest_reports_invalid_records_and_keeps_the_rest() {
    let ingested = bundle().ingest();

    assert_eq!(ingested.inputs.len(), 3);
    assert!(ingested.overrides.is_empty());
    assert_eq!(ingested.issues.len(), 2);

    let uncalibrated = ingested
        .issues
        .iter()
        .find(|i| i.record == "uncalibrated")
        .expect("uncalibrated sensor rejected");
    assert_eq!(uncalibrated.error, IngestError::MissingField("g_scale"));
    assert!(ingested.issues.iter().any(|i| i.record == "override[0]"));
}

fn sensor<'a>(fleet: &'a FleetAssessment, id: &str) -> &'a SensorAssessment {
    fleet
        .sensors
        .iter()
        .find(|s| s.sensor_id == id)
        .expect("sensor assessed")
}

#[test]
fn fleet_assessment_end_to_end() {
    let ingested = bundle().ingest();
    let engine = VibrationEngine::new(EngineConfig::default());
    let fleet = engine.assess_fleet(&ingested.inputs, &ingested.overrides);

    // 1000 counts at 100 Hz: spectral peak RMS (|X|/N/√2) ≈ 2.7 mm/s, Warning
    // for mediumFlexible. The time-domain RMS is about twice that.
    let pump = sensor(&fleet, "pump-de");
    assert_eq!(pump.status, SensorStatus::Level(StatusLevel::Warning));
    let h = pump.axis(Axis::H).expect("h axis");
    assert!((h.analysis.stats.dominant_freq - 100.0).abs() <= SAMPLE_RATE / LINES as f64);
    let temperature = pump.temperature.as_ref().expect("temperature assessed");
    assert_eq!(temperature.status, Some(StatusLevel::Warning));

    assert_eq!(sensor(&fleet, "fan-nde").status, SensorStatus::Lost);

    let idle = sensor(&fleet, "idle-motor");
    assert_eq!(idle.status, SensorStatus::Standby);
    assert!(idle.axes.iter().all(|a| a.status.is_none()));

    assert_eq!(fleet.summary.warning, 1);
    assert_eq!(fleet.summary.lost, 1);
    assert_eq!(fleet.summary.standby, 1);
    assert_eq!(fleet.summary.total(), 3);
}

#[test]
fn stub_buffers_never_classify_as_normal() {
    let ingested = serde_json::from_value::<AnalysisBundle>(json!({
        "sensors": [{
            "sensor_id": "stub",
            "machine_class": "mediumFlexible",
            "g_scale": 2,
            "fmax": 1000,
            "samples": { "h": [4000], "v": [4000, -4000], "a": [4000, -4000, 4000] }
        }]
    }))
    .expect("bundle deserializes")
    .ingest();
    let engine = VibrationEngine::new(EngineConfig::default());
    let assessment = engine.assess_sensor(&ingested.inputs[0], &ingested.overrides);

    assert_eq!(assessment.status, SensorStatus::Standby);
    assert!(assessment
        .axes
        .iter()
        .all(|a| !a.analysis.stats.has_data && a.status.is_none()));
}

#[test]
fn report_without_spectra_keeps_peaks() {
    let ingested = bundle().ingest();
    let engine = VibrationEngine::new(EngineConfig::default());
    let assessment = engine
        .assess_sensor(&ingested.inputs[0], &ingested.overrides)
        .without_spectra();

    let h = assessment.axis(Axis::H).expect("h axis");
    assert!(h.analysis.accel_spectrum.is_none());
    assert!(h.analysis.velocity_spectrum.is_none());
    assert!(!h.analysis.velocity_peaks.peaks.is_empty());

    let json = serde_json::to_value(&assessment).expect("serializes");
    assert_eq!(json["sensor_id"], "pump-de");
}
