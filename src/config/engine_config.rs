//! Engine Configuration - acquisition, spectrum and fallback threshold values
//!
//! Each struct implements `Default` with the built-in constants from
//! [`super::defaults`], so a missing file or missing section behaves exactly
//! like the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::processing::Window;
use crate::thresholds::ThresholdError;
use crate::types::{Quantity, ThresholdSet};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the analysis engine.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$VIBRATION_CONFIG` env var
/// 2. `./engine_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Acquisition-to-sample-rate mapping
    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// FFT and peak extraction
    #[serde(default)]
    pub spectrum: SpectrumConfig,

    /// Last-resort thresholds per quantity
    #[serde(default)]
    pub defaults: DefaultThresholds,
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$VIBRATION_CONFIG` environment variable
    /// 2. `./engine_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load engine config, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No engine config found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings with a suggested correction; they
    /// never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Engine config saved");
        Ok(())
    }

    /// Validate internal consistency.
    ///
    /// Rules:
    /// - Fallback thresholds must be finite, positive and ascending
    /// - `top_peaks` must be > 0
    /// - `sample_rate_factor` must be finite and > 0
    /// - `velocity_low_cut_hz` must be finite and >= 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        for quantity in [Quantity::Velocity, Quantity::Temperature] {
            if let Err(e) = self.defaults.for_quantity(quantity).to_set() {
                errors.push(format!("defaults.{quantity}: {e}"));
            }
        }

        if self.spectrum.top_peaks == 0 {
            errors.push("spectrum.top_peaks must be > 0".to_string());
        }

        let factor = self.acquisition.sample_rate_factor;
        if !factor.is_finite() || factor <= 0.0 {
            errors.push(format!(
                "acquisition.sample_rate_factor ({factor}) must be a positive number"
            ));
        }

        let low_cut = self.spectrum.velocity_low_cut_hz;
        if !low_cut.is_finite() || low_cut < 0.0 {
            errors.push(format!(
                "spectrum.velocity_low_cut_hz ({low_cut}) must be >= 0"
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Acquisition
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcquisitionConfig {
    /// Sample rate = `fmax` × this factor
    #[serde(default = "default_sample_rate_factor")]
    pub sample_rate_factor: f64,
}

fn default_sample_rate_factor() -> f64 {
    defaults::SAMPLE_RATE_FACTOR
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            sample_rate_factor: default_sample_rate_factor(),
        }
    }
}

// ============================================================================
// Spectrum
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectrumConfig {
    /// Window applied before every FFT on the analysis path
    #[serde(default)]
    pub window: Window,

    /// Round the transform length up to a power of two
    #[serde(default = "default_zero_pad")]
    pub zero_pad: bool,

    /// Peaks retained per spectrum
    #[serde(default = "default_top_peaks")]
    pub top_peaks: usize,

    /// Velocity peaks below this frequency are ignored (Hz)
    #[serde(default = "default_velocity_low_cut")]
    pub velocity_low_cut_hz: f64,
}

fn default_zero_pad() -> bool {
    true
}
fn default_top_peaks() -> usize {
    defaults::TOP_PEAKS
}
fn default_velocity_low_cut() -> f64 {
    defaults::VELOCITY_LOW_CUT_HZ
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            window: Window::default(),
            zero_pad: default_zero_pad(),
            top_peaks: default_top_peaks(),
            velocity_low_cut_hz: default_velocity_low_cut(),
        }
    }
}

// ============================================================================
// Fallback thresholds
// ============================================================================

/// Raw min/medium/max triple as written in the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThresholdBounds {
    pub min: f64,
    pub medium: f64,
    pub max: f64,
}

impl ThresholdBounds {
    pub fn to_set(&self) -> Result<ThresholdSet, ThresholdError> {
        ThresholdSet::new(self.min, self.medium, self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultThresholds {
    #[serde(default = "default_velocity_bounds")]
    pub velocity: ThresholdBounds,

    #[serde(default = "default_temperature_bounds")]
    pub temperature: ThresholdBounds,
}

fn default_velocity_bounds() -> ThresholdBounds {
    ThresholdBounds {
        min: defaults::VELOCITY_MIN,
        medium: defaults::VELOCITY_MEDIUM,
        max: defaults::VELOCITY_MAX,
    }
}
fn default_temperature_bounds() -> ThresholdBounds {
    ThresholdBounds {
        min: defaults::TEMPERATURE_MIN,
        medium: defaults::TEMPERATURE_MEDIUM,
        max: defaults::TEMPERATURE_MAX,
    }
}

impl Default for DefaultThresholds {
    fn default() -> Self {
        Self {
            velocity: default_velocity_bounds(),
            temperature: default_temperature_bounds(),
        }
    }
}

impl DefaultThresholds {
    pub fn for_quantity(&self, quantity: Quantity) -> &ThresholdBounds {
        match quantity {
            Quantity::Velocity => &self.velocity,
            Quantity::Temperature => &self.temperature,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
