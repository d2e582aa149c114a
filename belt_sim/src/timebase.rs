//! Fixed sample grid and time/index conversions.

use belt_common::consts::SAMPLE_PERIOD;
use belt_common::error::PipelineError;

use crate::trajectory::Trajectory;

/// Sample period and its reciprocal, shared by every stage of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBase {
    /// Sample period [s].
    sample_period: f64,
    /// Samples per second.
    rate: f64,
}

impl Default for TimeBase {
    fn default() -> Self {
        Self {
            sample_period: SAMPLE_PERIOD,
            rate: 1.0 / SAMPLE_PERIOD,
        }
    }
}

impl TimeBase {
    /// Create a time base. The period must be positive and finite.
    pub fn new(sample_period: f64) -> Result<Self, PipelineError> {
        if !(sample_period.is_finite() && sample_period > 0.0) {
            return Err(PipelineError::configuration(format!(
                "sample period must be positive, got {sample_period}"
            )));
        }
        Ok(Self {
            sample_period,
            rate: 1.0 / sample_period,
        })
    }

    /// Sample period [s].
    #[inline]
    pub const fn sample_period(&self) -> f64 {
        self.sample_period
    }

    /// Samples per second.
    #[inline]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Nearest sample index for a non-negative time `t` (halves round up).
    #[inline]
    pub fn time_to_index(&self, t: f64) -> usize {
        (t * self.rate + 0.5) as usize
    }

    /// Time of sample `index` [s].
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.sample_period
    }

    /// Time axis `times[i] = i · sample_period` of length `len`.
    pub fn times(&self, len: usize) -> Trajectory {
        (0..len).map(|i| self.time_at(i)).collect()
    }
}
