//! Engine Configuration Module
//!
//! Provides tunable analysis parameters loaded from TOML files.
//!
//! ## Loading Order
//!
//! 1. `VIBRATION_CONFIG` environment variable (path to TOML file)
//! 2. `engine_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The engine never reads configuration from global state: callers load an
//! [`EngineConfig`] once and hand it to [`crate::engine::VibrationEngine`].

mod engine_config;
pub mod defaults;
pub mod validation;

pub use engine_config::*;
