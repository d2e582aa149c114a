//! Belt-as-spring response estimator.
//!
//! The toolhead is a unit mass pulled towards the commanded position by a
//! spring of stiffness ω² and slowed by velocity damping. Each sample is
//! integrated with the step order below; the compensation filters are
//! tuned against exactly this discretization.
//!
//! ```text
//! pos += vel · dt
//! acc  = (cmd - pos) · ω²
//! vel += acc · dt
//! vel -= vel · damping · dt
//! out  = pos
//! ```

use belt_common::model::SpringModel;

use crate::timebase::TimeBase;
use crate::trajectory::Trajectory;

/// Integrator state of the simulated toolhead.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeadState {
    /// Head position [mm].
    pub position: f64,
    /// Head velocity [mm/s].
    pub velocity: f64,
}

impl HeadState {
    /// Advance one sample towards `commanded` and return the new position.
    #[inline]
    pub fn step(&mut self, commanded: f64, stiffness: f64, damping: f64, dt: f64) -> f64 {
        self.position += self.velocity * dt;
        let accel = (commanded - self.position) * stiffness;
        self.velocity += accel * dt;
        self.velocity -= self.velocity * damping * dt;
        self.position
    }
}

/// Predicts where the belt-driven head ends up for a commanded trajectory.
#[derive(Debug, Clone, Copy)]
pub struct SpringEstimator {
    stiffness: f64,
    damping: f64,
    dt: f64,
}

impl SpringEstimator {
    /// Create an estimator for `model` on the given sample grid.
    pub fn new(model: &SpringModel, timebase: &TimeBase) -> Self {
        Self {
            stiffness: model.stiffness(),
            damping: model.damping,
            dt: timebase.sample_period(),
        }
    }

    /// Simulate from rest at the origin.
    pub fn simulate(&self, commanded: &[f64]) -> Trajectory {
        let mut head = HeadState::default();
        commanded
            .iter()
            .map(|&cmd| head.step(cmd, self.stiffness, self.damping, self.dt))
            .collect()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
