//! Configuration loading traits and types.
//!
//! A simulation run is described by one TOML file. Every section is
//! optional and defaults to the reference constants, so an empty file
//! reproduces the reference run.
//!
//! # Usage
//!
//! ```rust,no_run
//! use belt_common::config::{ConfigLoader, ConfigError, SimulationConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = SimulationConfig::load(Path::new("belt_sim.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::{
    ACCEL, MARGIN_TIME, MARGIN_TIME_MAX, SAMPLE_PERIOD, SAMPLE_PERIOD_MAX, SAMPLE_PERIOD_MIN,
    SPRING_FREQ_MAX,
};
use crate::model::{AccelOrder, FilterKind, SpringConstants, SpringModel};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Common fields of the `[shared]` section.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "belt-sim"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Run identifier, echoed in the summary and the output bundle.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_service_name() -> String {
    "belt-sim".to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Sections ───────────────────────────────────────────────────────

/// `[timing]` — sampling grid and report margins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Sample period [s].
    #[serde(default = "default_sample_period")]
    pub sample_period: f64,
    /// Margin trimmed from both ends of every reported trajectory [s].
    #[serde(default = "default_margin_time")]
    pub margin_time: f64,
}

fn default_sample_period() -> f64 {
    SAMPLE_PERIOD
}
fn default_margin_time() -> f64 {
    MARGIN_TIME
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sample_period: SAMPLE_PERIOD,
            margin_time: MARGIN_TIME,
        }
    }
}

/// `[motion]` — move list generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Acceleration magnitude of every ramp [mm/s²].
    #[serde(default = "default_accel")]
    pub accel: f64,
    /// Acceleration kernel order (2, 4 or 6).
    #[serde(default)]
    pub accel_order: AccelOrder,
}

fn default_accel() -> f64 {
    ACCEL
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            accel: ACCEL,
            accel_order: AccelOrder::default(),
        }
    }
}

/// `[filter]` — compensation filter selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Filter applied to the commanded positions.
    #[serde(default)]
    pub kind: FilterKind,
    /// Smoothing window [s]; `None` = matched to the spring period.
    #[serde(default)]
    pub smooth_time: Option<f64>,
}

impl FilterConfig {
    /// Window length used by windowed filters.
    #[inline]
    pub fn resolved_smooth_time(&self, constants: &SpringConstants) -> f64 {
        self.smooth_time.unwrap_or(constants.smooth_time)
    }
}

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete description of one simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub spring: SpringModel,
    #[serde(default)]
    pub filter: FilterConfig,
}

impl SimulationConfig {
    /// Load from `path`, or fall back to the reference configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let t = &self.timing;
        check_range("sample_period", t.sample_period, SAMPLE_PERIOD_MIN, SAMPLE_PERIOD_MAX)?;
        check_range("margin_time", t.margin_time, 0.0, MARGIN_TIME_MAX)?;

        if !(self.motion.accel.is_finite() && self.motion.accel > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "accel must be positive and finite, got {}",
                self.motion.accel
            )));
        }

        let s = &self.spring;
        if !(s.natural_frequency > 0.0 && s.natural_frequency <= SPRING_FREQ_MAX) {
            return Err(ConfigError::ValidationError(format!(
                "natural_frequency {} out of range (0, {}]",
                s.natural_frequency, SPRING_FREQ_MAX
            )));
        }
        if !(s.damping.is_finite() && s.damping >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "damping must be non-negative and finite, got {}",
                s.damping
            )));
        }

        if let Some(st) = self.filter.smooth_time {
            if !(st.is_finite() && st > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "smooth_time must be positive and finite, got {st}"
                )));
            }
        }
        Ok(())
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(value >= min && value <= max) {
        return Err(ConfigError::ValidationError(format!(
            "{name} {value} out of range [{min}, {max}]"
        )));
    }
    Ok(())
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(LogLevel::Warn.as_directive(), "warn");
    }

    #[test]
    fn test_log_level_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct TestWrapper {
            level: LogLevel,
        }

        assert_eq!(
            toml::from_str::<TestWrapper>("level = \"trace\"")
                .unwrap()
                .level,
            LogLevel::Trace
        );
        assert_eq!(
            toml::from_str::<TestWrapper>("level = \"error\"")
                .unwrap()
                .level,
            LogLevel::Error
        );
    }

    #[test]
    fn test_empty_config_is_reference_run() {
        let config: SimulationConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.sample_period, SAMPLE_PERIOD);
        assert_eq!(config.timing.margin_time, MARGIN_TIME);
        assert_eq!(config.motion.accel, ACCEL);
        assert_eq!(config.motion.accel_order, AccelOrder::Two);
        assert_eq!(config.spring, SpringModel::default());
        assert_eq!(config.filter.kind, FilterKind::SpringWeighted2);
        assert_eq!(config.shared.service_name, "belt-sim");
    }

    #[test]
    fn test_validation_rejects_zero_frequency() {
        let mut config = SimulationConfig::default();
        config.spring.natural_frequency = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_nan_sample_period() {
        let mut config = SimulationConfig::default();
        config.timing.sample_period = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_non_positive_smooth_time() {
        let mut config = SimulationConfig::default();
        config.filter.smooth_time = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_service_name() {
        let mut config = SimulationConfig::default();
        config.shared.service_name.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_resolved_smooth_time_defaults_to_spring_period() {
        let constants = SpringModel::default().constants();
        let filter = FilterConfig::default();
        assert_eq!(filter.resolved_smooth_time(&constants), constants.smooth_time);
        let filter = FilterConfig {
            kind: FilterKind::Weighted,
            smooth_time: Some(0.040),
        };
        assert_eq!(filter.resolved_smooth_time(&constants), 0.040);
    }

    #[test]
    fn test_config_loader_file_not_found() {
        let result = SimulationConfig::load(Path::new("/nonexistent/path/belt_sim.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound)));
    }

    #[test]
    fn test_config_loader_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml {{{{").unwrap();

        let result = SimulationConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_loader_success() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
log_level = "debug"
service_name = "bench-x"

[motion]
accel_order = 4

[spring]
natural_frequency = 50.0

[filter]
kind = "weighted"
smooth_time = 0.040
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = SimulationConfig::load(file.path()).unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Debug);
        assert_eq!(config.shared.service_name, "bench-x");
        assert_eq!(config.motion.accel_order, AccelOrder::Four);
        assert_eq!(config.spring.natural_frequency, 50.0);
        assert_eq!(config.spring.damping, crate::consts::DAMPING);
        assert_eq!(config.filter.kind, FilterKind::Weighted);
        assert_eq!(config.filter.smooth_time, Some(0.040));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = SimulationConfig::load_or_default(None).unwrap();
        assert_eq!(config.filter.kind, FilterKind::default());
    }
}
