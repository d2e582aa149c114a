//! Commanded-position generator.
//!
//! Walks the move list with a running time/distance cursor and samples
//! each segment on the fixed grid using the selected acceleration kernel.
//!
//! ```text
//! order 2:  d(t) = (v0 + a·t/2)·t
//! order 4:  d(t) = ((c4·t + c3)·t² + c1)·t            c4 = -a/2T², c3 = a/T
//! order 6:  d(t) = (((c6·t + c5)·t + c4)·t³ + c1)·t   c6 = a/T⁴, c5 = -3a/T³, c4 = 5a/2T²
//! ```
//!
//! All three kernels cover the same distance and reach the same end
//! velocity `v0 + a·T`; orders 4 and 6 only reshape the acceleration
//! inside the segment.

use belt_common::error::PipelineError;
use belt_common::model::{AccelOrder, MoveSegment};
use tracing::debug;

use crate::timebase::TimeBase;
use crate::trajectory::Trajectory;

// ─── Kernels ────────────────────────────────────────────────────────

/// Displacement since the segment start for a given acceleration shape.
pub trait AccelKernel {
    /// Displacement at `rel_t` into a segment of length `move_t` that
    /// starts at `start_v` and changes velocity by `accel · move_t`.
    fn displacement(&self, rel_t: f64, start_v: f64, accel: f64, move_t: f64) -> f64;
}

impl AccelKernel for AccelOrder {
    #[inline]
    fn displacement(&self, rel_t: f64, start_v: f64, accel: f64, move_t: f64) -> f64 {
        match self {
            AccelOrder::Two => displacement_order2(rel_t, start_v, accel),
            AccelOrder::Four => displacement_order4(rel_t, start_v, accel, move_t),
            AccelOrder::Six => displacement_order6(rel_t, start_v, accel, move_t),
        }
    }
}

/// Constant acceleration.
#[inline]
pub fn displacement_order2(rel_t: f64, start_v: f64, accel: f64) -> f64 {
    (start_v + 0.5 * accel * rel_t) * rel_t
}

/// Quartic Bezier blend ("accel_order=4").
#[inline]
pub fn displacement_order4(rel_t: f64, start_v: f64, accel: f64, move_t: f64) -> f64 {
    let inv_accel_t = 1.0 / move_t;
    let accel_div_accel_t = accel * inv_accel_t;
    let accel_div_accel_t2 = accel_div_accel_t * inv_accel_t;

    let c4 = -0.5 * accel_div_accel_t2;
    let c3 = accel_div_accel_t;
    let c1 = start_v;
    ((c4 * rel_t + c3) * rel_t * rel_t + c1) * rel_t
}

/// Sextic Bezier blend ("accel_order=6").
#[inline]
pub fn displacement_order6(rel_t: f64, start_v: f64, accel: f64, move_t: f64) -> f64 {
    let inv_accel_t = 1.0 / move_t;
    let accel_div_accel_t = accel * inv_accel_t;
    let accel_div_accel_t2 = accel_div_accel_t * inv_accel_t;
    let accel_div_accel_t3 = accel_div_accel_t2 * inv_accel_t;
    let accel_div_accel_t4 = accel_div_accel_t3 * inv_accel_t;

    let c6 = accel_div_accel_t4;
    let c5 = -3.0 * accel_div_accel_t3;
    let c4 = 2.5 * accel_div_accel_t2;
    let c1 = start_v;
    (((c6 * rel_t + c5) * rel_t + c4) * rel_t * rel_t * rel_t + c1) * rel_t
}

// ─── Generator ──────────────────────────────────────────────────────

/// Running position of the generator between segments.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    /// Exact start time of the current segment [s].
    start_t: f64,
    /// Accumulated distance at the start of the current segment [mm].
    start_d: f64,
    /// Next sample index to emit.
    next_index: usize,
}

/// Turns a move list into densely sampled commanded positions.
#[derive(Debug, Clone, Copy)]
pub struct ProfileGenerator {
    timebase: TimeBase,
    accel: f64,
    order: AccelOrder,
}

impl ProfileGenerator {
    /// Create a generator. `accel` is the ramp acceleration magnitude.
    pub fn new(timebase: TimeBase, accel: f64, order: AccelOrder) -> Result<Self, PipelineError> {
        if !(accel.is_finite() && accel > 0.0) {
            return Err(PipelineError::configuration(format!(
                "acceleration must be positive, got {accel}"
            )));
        }
        Ok(Self {
            timebase,
            accel,
            order,
        })
    }

    /// Selected acceleration kernel.
    pub const fn order(&self) -> AccelOrder {
        self.order
    }

    /// Sample every segment of `moves` in order.
    ///
    /// Samples fall on `i · sample_period` for every grid point inside
    /// `[segment_start, segment_start + duration]`. Segment boundaries are
    /// exact (not snapped to the grid) and zero-length segments emit nothing.
    pub fn generate(&self, moves: &[MoveSegment]) -> Result<Trajectory, PipelineError> {
        let mut out = Vec::new();
        let mut cursor = Cursor::default();

        for (n, seg) in moves.iter().enumerate() {
            let move_t = seg.resolved_duration(self.accel);
            if !(move_t.is_finite() && move_t >= 0.0) {
                return Err(PipelineError::configuration(format!(
                    "segment {n} has invalid duration {move_t}"
                )));
            }
            if move_t == 0.0 {
                debug!("segment {n}: zero duration, skipped");
                continue;
            }

            let accel = seg.signed_accel(self.accel);
            let end_t = cursor.start_t + move_t;
            let first = cursor.next_index;
            loop {
                let t = self.timebase.time_at(cursor.next_index);
                if t > end_t {
                    break;
                }
                let rel_t = t - cursor.start_t;
                out.push(
                    cursor.start_d
                        + self
                            .order
                            .displacement(rel_t, seg.start_velocity, accel, move_t),
                );
                cursor.next_index += 1;
            }

            let distance = self
                .order
                .displacement(move_t, seg.start_velocity, accel, move_t);
            debug!(
                "segment {n}: v {:.3}->{:.3}, a={accel}, t={move_t:.6}s, d={distance:.6}, samples {first}..{}",
                seg.start_velocity, seg.end_velocity, cursor.next_index
            );
            cursor.start_d += distance;
            cursor.start_t = end_t;
        }

        Ok(Trajectory::from(out))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
