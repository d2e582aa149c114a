//! Reference constants for the belt resonance simulation.
//!
//! Single source of truth for the default model parameters and the
//! numeric bounds enforced by configuration validation.

use static_assertions::const_assert;

/// Default sample period [s] (10 kHz).
pub const SAMPLE_PERIOD: f64 = 0.000_100;

/// Default margin removed from each end of every reported trajectory [s].
pub const MARGIN_TIME: f64 = 0.050;

/// Default acceleration magnitude of every move segment [mm/s²].
pub const ACCEL: f64 = 3000.0;

/// Default natural frequency of the belt spring [Hz].
pub const SPRING_FREQ: f64 = 35.0;

/// Default velocity damping coefficient of the belt spring [1/s].
pub const DAMPING: f64 = 30.0;

/// Sample period bounds [s].
pub const SAMPLE_PERIOD_MIN: f64 = 1e-7;
pub const SAMPLE_PERIOD_MAX: f64 = 0.01;

/// Margin time upper bound [s].
pub const MARGIN_TIME_MAX: f64 = 10.0;

/// Natural frequency upper bound [Hz].
pub const SPRING_FREQ_MAX: f64 = 10_000.0;

const_assert!(SAMPLE_PERIOD >= SAMPLE_PERIOD_MIN && SAMPLE_PERIOD <= SAMPLE_PERIOD_MAX);
const_assert!(MARGIN_TIME >= 0.0 && MARGIN_TIME <= MARGIN_TIME_MAX);
const_assert!(SPRING_FREQ > 0.0 && SPRING_FREQ <= SPRING_FREQ_MAX);
