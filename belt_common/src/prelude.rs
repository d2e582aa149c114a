//! Prelude module for common re-exports.
//!
//! ```rust
//! use belt_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SimulationConfig};

// ─── Model ──────────────────────────────────────────────────────────
pub use crate::model::{
    AccelOrder, DEFAULT_MOVES, FilterKind, MoveSegment, SpringConstants, SpringModel,
};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::PipelineError;

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{ACCEL, DAMPING, MARGIN_TIME, SAMPLE_PERIOD, SPRING_FREQ};
