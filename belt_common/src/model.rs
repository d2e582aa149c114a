//! Model types shared by every pipeline stage.
//!
//! Defines the move list entries, the belt spring parameters and the
//! closed sets of acceleration kernels and compensation filters.

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DAMPING, SPRING_FREQ};

// ─── Move Segments ──────────────────────────────────────────────────

/// One trapezoidal velocity segment of a single-axis move list.
///
/// A segment without an explicit duration ramps between its two
/// velocities at the global acceleration magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSegment {
    /// Velocity at the segment start [mm/s].
    pub start_velocity: f64,
    /// Velocity at the segment end [mm/s].
    pub end_velocity: f64,
    /// Explicit segment duration [s]; `None` = derived from the ramp.
    pub duration: Option<f64>,
}

impl MoveSegment {
    /// Segment with an explicit duration.
    pub const fn new(start_velocity: f64, end_velocity: f64, duration: f64) -> Self {
        Self {
            start_velocity,
            end_velocity,
            duration: Some(duration),
        }
    }

    /// Segment whose duration follows from `|Δv| / accel`.
    pub const fn ramp(start_velocity: f64, end_velocity: f64) -> Self {
        Self {
            start_velocity,
            end_velocity,
            duration: None,
        }
    }

    /// Duration of this segment for the given acceleration magnitude.
    #[inline]
    pub fn resolved_duration(&self, accel: f64) -> f64 {
        match self.duration {
            Some(t) => t,
            None => (self.end_velocity - self.start_velocity).abs() / accel,
        }
    }

    /// Signed acceleration of this segment: `+accel`, `-accel` or zero.
    #[inline]
    pub fn signed_accel(&self, accel: f64) -> f64 {
        if self.end_velocity > self.start_velocity {
            accel
        } else if self.end_velocity < self.start_velocity {
            -accel
        } else {
            0.0
        }
    }
}

/// Reference move list.
///
/// X velocities from: 0,0 → 0,20 → 40,40 → 80,40 → 80,80.
pub const DEFAULT_MOVES: [MoveSegment; 8] = [
    MoveSegment::new(0.0, 0.0, 0.100),
    MoveSegment::ramp(6.869, 89.443),
    MoveSegment::new(89.443, 89.443, 0.200),
    MoveSegment::ramp(89.443, 17.361),
    MoveSegment::ramp(19.410, 100.0),
    MoveSegment::new(100.0, 100.0, 0.200),
    MoveSegment::ramp(100.0, 5.0),
    MoveSegment::new(0.0, 0.0, 0.300),
];

// ─── Acceleration Order ─────────────────────────────────────────────

/// Polynomial family shaping the acceleration inside a segment.
///
/// Serialized as the plain integers `2`, `4` and `6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccelOrder {
    /// Constant acceleration.
    #[default]
    Two,
    /// Quartic blend, acceleration continuous at the segment ends.
    Four,
    /// Sextic blend, acceleration and jerk continuous at the segment ends.
    Six,
}

impl TryFrom<u8> for AccelOrder {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            6 => Ok(Self::Six),
            other => Err(format!("unsupported accel_order {other} (expected 2, 4 or 6)")),
        }
    }
}

impl From<AccelOrder> for u8 {
    fn from(order: AccelOrder) -> Self {
        match order {
            AccelOrder::Two => 2,
            AccelOrder::Four => 4,
            AccelOrder::Six => 6,
        }
    }
}

impl fmt::Display for AccelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "accel_order={}", u8::from(*self))
    }
}

// ─── Filter Kind ────────────────────────────────────────────────────

/// Compensation filter applied to the commanded positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Pass the commanded positions through unchanged.
    None,
    /// Two-point average `smooth_time` apart.
    Average,
    /// Uniform (box) average over `smooth_time`.
    Smooth,
    /// Triangular-weighted average over `smooth_time`.
    Weighted,
    /// Quadratic-decay weighted average over `smooth_time`.
    Weighted2,
    /// Inverse spring dynamics over adjacent samples.
    SpringRaw,
    /// Inverse spring dynamics over a wide stencil, then `Weighted`.
    SpringDoubleWeighted,
    /// Inverse spring dynamics, then `Weighted2` over the spring period.
    #[default]
    SpringWeighted2,
}

impl FilterKind {
    /// All filter kinds in declaration order.
    pub const ALL: [FilterKind; 8] = [
        FilterKind::None,
        FilterKind::Average,
        FilterKind::Smooth,
        FilterKind::Weighted,
        FilterKind::Weighted2,
        FilterKind::SpringRaw,
        FilterKind::SpringDoubleWeighted,
        FilterKind::SpringWeighted2,
    ];

    /// Configuration name of this filter.
    pub const fn name(&self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Average => "average",
            FilterKind::Smooth => "smooth",
            FilterKind::Weighted => "weighted",
            FilterKind::Weighted2 => "weighted2",
            FilterKind::SpringRaw => "spring_raw",
            FilterKind::SpringDoubleWeighted => "spring_double_weighted",
            FilterKind::SpringWeighted2 => "spring_weighted2",
        }
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown filter kind: {s}"))
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Spring Model ───────────────────────────────────────────────────

/// Belt modelled as a damped spring between motor and toolhead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringModel {
    /// Natural frequency [Hz].
    #[serde(default = "default_spring_freq")]
    pub natural_frequency: f64,
    /// Velocity damping coefficient [1/s].
    #[serde(default = "default_damping")]
    pub damping: f64,
}

fn default_spring_freq() -> f64 {
    SPRING_FREQ
}
fn default_damping() -> f64 {
    DAMPING
}

impl Default for SpringModel {
    fn default() -> Self {
        Self {
            natural_frequency: SPRING_FREQ,
            damping: DAMPING,
        }
    }
}

impl SpringModel {
    /// Create a spring model.
    pub const fn new(natural_frequency: f64, damping: f64) -> Self {
        Self {
            natural_frequency,
            damping,
        }
    }

    /// Angular frequency ω = 2πf [rad/s].
    #[inline]
    pub fn angular_frequency(&self) -> f64 {
        self.natural_frequency * 2.0 * PI
    }

    /// Spring stiffness per unit mass, ω² [1/s²].
    #[inline]
    pub fn stiffness(&self) -> f64 {
        self.angular_frequency().powi(2)
    }

    /// Derive the compensation constants from the two model parameters.
    pub fn constants(&self) -> SpringConstants {
        let spring_advance = 1.0 / self.stiffness();
        SpringConstants {
            spring_advance,
            resistance_advance: self.damping * spring_advance,
            smooth_time: (2.0 / 3.0) * 2.0 * PI * spring_advance.sqrt(),
        }
    }
}

/// Compensation constants derived once from a [`SpringModel`].
///
/// ```text
/// spring_advance     = 1 / ω²
/// resistance_advance = damping / ω²
/// smooth_time        = (2/3) · 2π · √spring_advance
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConstants {
    /// Second-derivative advance [s²].
    pub spring_advance: f64,
    /// First-derivative advance [s].
    pub resistance_advance: f64,
    /// Smoothing window matched to the spring period [s].
    pub smooth_time: f64,
}

// ─── Tests ──────────────────────────────────────────────────────────
