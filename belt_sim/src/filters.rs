//! Trajectory smoothing and resonance pre-compensation filters.
//!
//! Windowed filters look `offset` samples either side of each output
//! index and are only defined on the valid range `[offset, N - offset)`.
//! Samples outside the valid range are zero; callers trim them away
//! before reporting.
//!
//! The spring filters pre-distort the commanded positions by the inverse
//! of the belt dynamics so that the simulated head follows the commanded
//! trajectory:
//!
//! ```text
//! out[i] = pos[i] + sa·(pos[i-1] - 2·pos[i] + pos[i+1]) + ra·(pos[i+1] - pos[i])
//! sa = spring_advance · rate²,  ra = resistance_advance · rate
//! ```

use core::ops::Range;

use belt_common::error::PipelineError;
use belt_common::model::{FilterKind, SpringConstants};
use tracing::debug;

use crate::timebase::TimeBase;
use crate::trajectory::Trajectory;

// ─── Filter Window ──────────────────────────────────────────────────

/// Half-width of a smoothing window, in samples (always ≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterWindow {
    offset: usize,
}

impl FilterWindow {
    /// Window with an explicit half-width. Zero is rejected.
    pub fn new(offset: usize) -> Result<Self, PipelineError> {
        if offset == 0 {
            return Err(PipelineError::configuration(
                "filter window offset is zero (smoothing time shorter than one sample)",
            ));
        }
        Ok(Self { offset })
    }

    /// Window spanning `smooth_time` seconds: `offset = round(smooth_time/2 · rate)`.
    pub fn from_smooth_time(timebase: &TimeBase, smooth_time: f64) -> Result<Self, PipelineError> {
        Self::new(timebase.time_to_index(smooth_time * 0.5))
    }

    /// Half-width in samples.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Output indices for which the whole window lies inside `len` samples.
    pub fn valid_range(&self, len: usize) -> Result<Range<usize>, PipelineError> {
        if self.offset > len / 2 {
            return Err(PipelineError::configuration(format!(
                "filter window of {} samples exceeds trajectory length {len}",
                self.offset.saturating_mul(2)
            )));
        }
        Ok(self.offset..len - self.offset)
    }
}

// ─── Windowed Averages ──────────────────────────────────────────────

/// Weighted sum over `[i - offset, i + offset)` for every valid `i`.
///
/// The window is checked against `pos` before the kernel is built.
fn convolve(
    pos: &[f64],
    window: FilterWindow,
    shape: impl Fn(f64, f64) -> f64,
    weight: f64,
) -> Result<Trajectory, PipelineError> {
    let range = window.valid_range(pos.len())?;
    let weights = kernel(window, shape);
    let offset = window.offset();
    let mut out = Trajectory::zeros(pos.len());
    let o = out.as_mut_slice();
    for i in range {
        let sum: f64 = pos[i - offset..i + offset]
            .iter()
            .zip(&weights)
            .map(|(p, k)| p * k)
            .sum();
        o[i] = sum * weight;
    }
    Ok(out)
}

/// Kernel of length `2·offset` built from the distance `|j - i|`.
fn kernel(window: FilterWindow, shape: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let offset = window.offset() as f64;
    (0..2 * window.offset())
        .map(|m| shape(offset, (m as f64 - offset).abs()))
        .collect()
}

/// Simple average between two points `smooth_time` apart.
///
/// ```text
/// out[i] = (pos[i-offset] + pos[i+offset]) / 2
/// ```
pub fn average(pos: &[f64], window: FilterWindow) -> Result<Trajectory, PipelineError> {
    let range = window.valid_range(pos.len())?;
    let offset = window.offset();
    let mut out = Trajectory::zeros(pos.len());
    let o = out.as_mut_slice();
    for i in range {
        o[i] = 0.5 * (pos[i - offset] + pos[i + offset]);
    }
    Ok(out)
}

/// Uniform (box) average over the window.
pub fn smooth(pos: &[f64], window: FilterWindow) -> Result<Trajectory, PipelineError> {
    let weight = 0.5 / window.offset() as f64;
    convolve(pos, window, |_, _| 1.0, weight)
}

/// Triangular-weighted average, peak at the window center.
///
/// ```text
/// out[i] = Σ pos[j] · (offset - |j-i|) / offset²
/// ```
pub fn weighted(pos: &[f64], window: FilterWindow) -> Result<Trajectory, PipelineError> {
    let weight = 1.0 / (window.offset() as f64).powi(2);
    convolve(pos, window, |offset, d| offset - d, weight)
}

/// Quadratic-decay weighted average.
///
/// ```text
/// out[i] = Σ pos[j] · (offset - |j-i|)² · (2·|j-i| + offset) / offset⁴
/// ```
///
/// Smoother at the window edges than [`weighted`], so it suppresses
/// higher-frequency content of the input.
pub fn weighted2(pos: &[f64], window: FilterWindow) -> Result<Trajectory, PipelineError> {
    let weight = 1.0 / (window.offset() as f64).powi(4);
    convolve(
        pos,
        window,
        |offset, d| (offset - d).powi(2) * (2.0 * d + offset),
        weight,
    )
}

// ─── Spring Compensation ────────────────────────────────────────────

/// Inverse spring dynamics over adjacent samples, valid on `[1, N-1)`.
pub fn spring_raw(pos: &[f64], timebase: &TimeBase, constants: &SpringConstants) -> Trajectory {
    let rate = timebase.rate();
    let sa = constants.spring_advance * rate * rate;
    let ra = constants.resistance_advance * rate;
    let mut out = Trajectory::zeros(pos.len());
    let o = out.as_mut_slice();
    for i in 1..pos.len().saturating_sub(1) {
        o[i] = pos[i]
            + sa * (pos[i - 1] - 2.0 * pos[i] + pos[i + 1])
            + ra * (pos[i + 1] - pos[i]);
    }
    out
}

/// Inverse spring dynamics with the second difference taken over a
/// quarter of `smooth_time`, followed by [`weighted`] over half of it.
pub fn spring_double_weighted(
    pos: &[f64],
    timebase: &TimeBase,
    constants: &SpringConstants,
    smooth_time: f64,
) -> Result<Trajectory, PipelineError> {
    let window = FilterWindow::new(timebase.time_to_index(smooth_time * 0.25))?;
    let range = window.valid_range(pos.len())?;
    let offset = window.offset();
    let sa = constants.spring_advance * (timebase.rate() / offset as f64).powi(2);
    let ra = constants.resistance_advance * timebase.rate();

    let mut out = Trajectory::zeros(pos.len());
    let o = out.as_mut_slice();
    for i in range {
        o[i] = pos[i]
            + sa * (pos[i - offset] - 2.0 * pos[i] + pos[i + offset])
            + ra * (pos[i + 1] - pos[i]);
    }
    weighted(&out, FilterWindow::from_smooth_time(timebase, 0.5 * smooth_time)?)
}

/// Production compensation: [`spring_raw`] then [`weighted2`] over `smooth_time`.
pub fn spring_weighted2(
    pos: &[f64],
    timebase: &TimeBase,
    constants: &SpringConstants,
    smooth_time: f64,
) -> Result<Trajectory, PipelineError> {
    let window = FilterWindow::from_smooth_time(timebase, smooth_time)?;
    weighted2(&spring_raw(pos, timebase, constants), window)
}

// ─── Filter Bank ────────────────────────────────────────────────────

/// Dispatches a [`FilterKind`] to its implementation with shared parameters.
#[derive(Debug, Clone, Copy)]
pub struct FilterBank {
    timebase: TimeBase,
    constants: SpringConstants,
    smooth_time: f64,
}

impl FilterBank {
    /// Create a filter bank. `smooth_time` is used by every windowed filter.
    pub fn new(timebase: TimeBase, constants: SpringConstants, smooth_time: f64) -> Self {
        Self {
            timebase,
            constants,
            smooth_time,
        }
    }

    /// Check that `kind` has a non-degenerate window.
    ///
    /// Call once at construction time so misconfiguration fails before
    /// any trajectory is generated.
    pub fn check(&self, kind: FilterKind) -> Result<(), PipelineError> {
        match kind {
            FilterKind::None | FilterKind::SpringRaw => Ok(()),
            FilterKind::SpringDoubleWeighted => {
                FilterWindow::new(self.timebase.time_to_index(self.smooth_time * 0.25))?;
                FilterWindow::from_smooth_time(&self.timebase, 0.5 * self.smooth_time)?;
                Ok(())
            }
            _ => FilterWindow::from_smooth_time(&self.timebase, self.smooth_time).map(|_| ()),
        }
    }

    /// Apply `kind` to the commanded positions.
    pub fn apply(&self, kind: FilterKind, pos: &[f64]) -> Result<Trajectory, PipelineError> {
        let tb = &self.timebase;
        debug!(
            "applying {kind} filter (smooth_time={:.6}s) to {} samples",
            self.smooth_time,
            pos.len()
        );
        match kind {
            FilterKind::None => Ok(Trajectory::from(pos.to_vec())),
            FilterKind::Average => average(pos, FilterWindow::from_smooth_time(tb, self.smooth_time)?),
            FilterKind::Smooth => smooth(pos, FilterWindow::from_smooth_time(tb, self.smooth_time)?),
            FilterKind::Weighted => weighted(pos, FilterWindow::from_smooth_time(tb, self.smooth_time)?),
            FilterKind::Weighted2 => weighted2(pos, FilterWindow::from_smooth_time(tb, self.smooth_time)?),
            FilterKind::SpringRaw => Ok(spring_raw(pos, tb, &self.constants)),
            FilterKind::SpringDoubleWeighted => {
                spring_double_weighted(pos, tb, &self.constants, self.smooth_time)
            }
            FilterKind::SpringWeighted2 => {
                spring_weighted2(pos, tb, &self.constants, self.smooth_time)
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
