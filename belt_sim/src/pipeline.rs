//! End-to-end simulation run.
//!
//! ```text
//! moves ─► ProfileGenerator ─► positions ─┬─► derivative ×2 ─────────────► nominal vel/acc
//!                                         ├─► FilterBank ─► updated ─┬─► derivative ×2
//!                                         │                          └─► SpringEstimator ─► head (updated)
//!                                         └─► SpringEstimator ─► head (nominal)
//!                          deviations = head − positions ─► Trimmer ─► MotionBundle
//! ```
//!
//! Every stage is a pure function of its input; a [`Pipeline`] only
//! holds the validated parameters, so one instance can be run repeatedly.

use belt_common::config::SimulationConfig;
use belt_common::error::PipelineError;
use belt_common::model::{AccelOrder, DEFAULT_MOVES, FilterKind, MoveSegment, SpringModel};
use serde::Serialize;
use tracing::{debug, info};

use crate::derivative::derivative;
use crate::filters::FilterBank;
use crate::profile::ProfileGenerator;
use crate::spring::SpringEstimator;
use crate::timebase::TimeBase;
use crate::trajectory::Trajectory;
use crate::trim::Trimmer;

// ─── Output ─────────────────────────────────────────────────────────

/// Peak head deviation with and without compensation, over the trimmed window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviationSummary {
    /// Peak |head − commanded| of the uncompensated run [mm].
    pub nominal_peak: f64,
    /// Peak |head − commanded| of the compensated run [mm].
    pub compensated_peak: f64,
}

impl DeviationSummary {
    /// `compensated_peak / nominal_peak`; below 1 means the filter helps.
    ///
    /// `None` when the nominal run has no deviation (e.g. no motion).
    pub fn ratio(&self) -> Option<f64> {
        (self.nominal_peak > 0.0).then(|| self.compensated_peak / self.nominal_peak)
    }
}

/// Trimmed, equal-length trajectories of one run.
#[derive(Debug, Clone, Serialize)]
pub struct MotionBundle {
    /// Run identifier.
    pub name: String,
    /// Kernel used for the commanded positions.
    pub accel_order: AccelOrder,
    /// Compensation filter.
    pub filter: FilterKind,
    /// Belt model.
    pub spring: SpringModel,
    /// Untrimmed length of the commanded positions.
    pub raw_len: usize,
    /// Time axis [s].
    pub times: Trajectory,
    /// Commanded positions [mm].
    pub positions: Trajectory,
    /// Compensated commanded positions [mm].
    pub upd_positions: Trajectory,
    /// Nominal commanded velocity [mm/s].
    pub velocities: Trajectory,
    /// Nominal commanded acceleration [mm/s²].
    pub accels: Trajectory,
    /// Compensated commanded velocity [mm/s].
    pub upd_velocities: Trajectory,
    /// Compensated commanded acceleration [mm/s²].
    pub upd_accels: Trajectory,
    /// Head deviation from the commanded positions, nominal run [mm].
    pub spring_diff_orig: Trajectory,
    /// Head deviation from the commanded positions, compensated run [mm].
    pub spring_diff_upd: Trajectory,
    /// Head velocity, nominal run [mm/s].
    pub head_velocities: Trajectory,
    /// Head acceleration, nominal run [mm/s²].
    pub head_accels: Trajectory,
    /// Head velocity, compensated run [mm/s].
    pub head_upd_velocities: Trajectory,
    /// Head acceleration, compensated run [mm/s²].
    pub head_upd_accels: Trajectory,
    /// Peak deviations.
    pub summary: DeviationSummary,
}

impl MotionBundle {
    /// Length shared by every trajectory of the bundle.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the trimmed window is empty.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

// ─── Pipeline ───────────────────────────────────────────────────────

/// Validated parameters of one simulation run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    timebase: TimeBase,
    generator: ProfileGenerator,
    spring: SpringModel,
    estimator: SpringEstimator,
    filter: FilterKind,
    bank: FilterBank,
    trimmer: Trimmer,
    moves: Vec<MoveSegment>,
}

impl Pipeline {
    /// Build a pipeline for the reference move list.
    ///
    /// The configuration is validated and every filter window is checked
    /// here, before any trajectory is generated.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let timebase = TimeBase::new(config.timing.sample_period)?;
        let generator =
            ProfileGenerator::new(timebase, config.motion.accel, config.motion.accel_order)?;
        let constants = config.spring.constants();
        let bank = FilterBank::new(
            timebase,
            constants,
            config.filter.resolved_smooth_time(&constants),
        );
        bank.check(config.filter.kind)?;

        debug!(
            "spring_advance={:.9}, resistance_advance={:.9}, smooth_time={:.6}",
            constants.spring_advance, constants.resistance_advance, constants.smooth_time
        );

        Ok(Self {
            name: config.shared.service_name.clone(),
            timebase,
            generator,
            spring: config.spring,
            estimator: SpringEstimator::new(&config.spring, &timebase),
            filter: config.filter.kind,
            bank,
            trimmer: Trimmer::new(&timebase, config.timing.margin_time),
            moves: DEFAULT_MOVES.to_vec(),
        })
    }

    /// Replace the move list.
    pub fn with_moves(mut self, moves: Vec<MoveSegment>) -> Self {
        self.moves = moves;
        self
    }

    /// Sample grid of this run.
    pub const fn timebase(&self) -> &TimeBase {
        &self.timebase
    }

    /// Commanded positions for the move list, untrimmed.
    pub fn positions(&self) -> Result<Trajectory, PipelineError> {
        self.generator.generate(&self.moves)
    }

    /// Run every stage and return the trimmed bundle.
    pub fn run(&self) -> Result<MotionBundle, PipelineError> {
        let tb = &self.timebase;

        // Nominal motion
        let positions = self.positions()?;
        positions.ensure_finite("profile")?;
        let velocities = derivative(&positions, tb);
        let accels = derivative(&velocities, tb);

        // Updated motion
        let upd_positions = self.bank.apply(self.filter, &positions)?;
        upd_positions.ensure_finite("compensation filter")?;
        let upd_velocities = derivative(&upd_positions, tb);
        let upd_accels = derivative(&upd_velocities, tb);

        // Estimated head position with the belt modelled as a spring
        let spring_orig = self.estimator.simulate(&positions);
        spring_orig.ensure_finite("spring estimate (nominal)")?;
        let spring_upd = self.estimator.simulate(&upd_positions);
        spring_upd.ensure_finite("spring estimate (compensated)")?;
        let spring_diff_orig = spring_orig.difference(&positions, "nominal deviation")?;
        let spring_diff_upd = spring_upd.difference(&positions, "compensated deviation")?;
        let head_velocities = derivative(&spring_orig, tb);
        let head_accels = derivative(&head_velocities, tb);
        let head_upd_velocities = derivative(&spring_upd, tb);
        let head_upd_accels = derivative(&head_upd_velocities, tb);

        let raw_len = positions.len();
        let mut bundle = MotionBundle {
            name: self.name.clone(),
            accel_order: self.generator.order(),
            filter: self.filter,
            spring: self.spring,
            raw_len,
            times: tb.times(raw_len),
            positions,
            upd_positions,
            velocities,
            accels,
            upd_velocities,
            upd_accels,
            spring_diff_orig,
            spring_diff_upd,
            head_velocities,
            head_accels,
            head_upd_velocities,
            head_upd_accels,
            summary: DeviationSummary {
                nominal_peak: 0.0,
                compensated_peak: 0.0,
            },
        };
        self.trimmer.trim_all(&mut [
            &mut bundle.times,
            &mut bundle.positions,
            &mut bundle.upd_positions,
            &mut bundle.velocities,
            &mut bundle.accels,
            &mut bundle.upd_velocities,
            &mut bundle.upd_accels,
            &mut bundle.spring_diff_orig,
            &mut bundle.spring_diff_upd,
            &mut bundle.head_velocities,
            &mut bundle.head_accels,
            &mut bundle.head_upd_velocities,
            &mut bundle.head_upd_accels,
        ])?;

        bundle.summary = DeviationSummary {
            nominal_peak: bundle.spring_diff_orig.peak_abs(),
            compensated_peak: bundle.spring_diff_upd.peak_abs(),
        };
        info!(
            "{}: {} samples ({} kept), {}, filter={}, peak deviation {:.6} -> {:.6} mm",
            bundle.name,
            raw_len,
            bundle.len(),
            bundle.accel_order,
            bundle.filter,
            bundle.summary.nominal_peak,
            bundle.summary.compensated_peak
        );
        Ok(bundle)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
