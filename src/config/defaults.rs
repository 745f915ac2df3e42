//! System-wide default constants.
//!
//! Built-in values used when no engine config file is present.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Acquisition
// ============================================================================

/// Sampling rate as a multiple of `fmax` (anti-alias filter margin).
pub const SAMPLE_RATE_FACTOR: f64 = 2.56;

// ============================================================================
// Spectrum
// ============================================================================

/// Number of peaks retained per spectrum.
pub const TOP_PEAKS: usize = 5;

/// Velocity peaks below this frequency are ignored (integration drift band).
pub const VELOCITY_LOW_CUT_HZ: f64 = 2.0;

// ============================================================================
// Threshold fallbacks
// ============================================================================

/// Velocity (mm/s) used when no other source supplies a boundary.
pub const VELOCITY_MIN: f64 = 0.1;
pub const VELOCITY_MEDIUM: f64 = 0.125;
pub const VELOCITY_MAX: f64 = 0.15;

/// Temperature (°C). Warning starts above 35 °C.
pub const TEMPERATURE_MIN: f64 = 35.0;
pub const TEMPERATURE_MEDIUM: f64 = 45.0;
pub const TEMPERATURE_MAX: f64 = 55.0;

// ============================================================================
// Config file discovery
// ============================================================================

/// Environment variable holding an explicit config path.
pub const CONFIG_ENV_VAR: &str = "VIBRATION_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "engine_config.toml";
