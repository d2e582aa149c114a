//! Fixed-timestep sample sequences.
//!
//! Every trajectory produced by one run shares the same length and phase:
//! sample `i` is the value at time `i · sample_period`. Combining two
//! trajectories of different lengths is a contract violation and is
//! reported instead of silently truncated.

use core::ops::{Deref, Range};

use belt_common::error::PipelineError;
use serde::Serialize;

/// Ordered sequence of `f64` samples on the shared time grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<f64>);

impl Trajectory {
    /// Trajectory of `len` zero samples.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Borrow the samples.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Lazily yield the samples by value.
    #[inline]
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Largest absolute sample value (0 for an empty trajectory).
    pub fn peak_abs(&self) -> f64 {
        self.0.iter().fold(0.0_f64, |peak, v| peak.max(v.abs()))
    }

    /// Fail unless `other` has the same length as `self`.
    pub fn ensure_same_len(&self, other: &[f64], context: &'static str) -> Result<(), PipelineError> {
        if self.0.len() != other.len() {
            return Err(PipelineError::LengthMismatch {
                context,
                expected: self.0.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }

    /// Sample-wise `self - other`.
    pub fn difference(&self, other: &[f64], context: &'static str) -> Result<Trajectory, PipelineError> {
        self.ensure_same_len(other, context)?;
        Ok(self.0.iter().zip(other).map(|(a, b)| a - b).collect())
    }

    /// Fail on the first NaN or infinite sample.
    pub fn ensure_finite(&self, stage: &'static str) -> Result<(), PipelineError> {
        match self.0.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(PipelineError::NonFinite { stage, index }),
            None => Ok(()),
        }
    }

    /// Keep only the samples inside `window`.
    pub(crate) fn keep_window(&mut self, window: Range<usize>) {
        self.0.truncate(window.end);
        self.0.drain(..window.start);
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

impl Deref for Trajectory {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Trajectory {
    fn from(samples: Vec<f64>) -> Self {
        Self(samples)
    }
}

impl FromIterator<f64> for Trajectory {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_is_sample_wise() {
        let a = Trajectory::from(vec![1.0, 2.0, 4.0]);
        let d = a.difference(&[0.5, 2.0, 5.0], "test").unwrap();
        assert_eq!(d.as_slice(), &[0.5, 0.0, -1.0]);
    }

    #[test]
    fn difference_rejects_mismatched_lengths() {
        let a = Trajectory::zeros(3);
        let err = a.difference(&[0.0; 2], "deviation").unwrap_err();
        assert_eq!(
            err,
            PipelineError::LengthMismatch {
                context: "deviation",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn peak_abs_uses_magnitude() {
        let a = Trajectory::from(vec![0.1, -0.7, 0.5]);
        assert_eq!(a.peak_abs(), 0.7);
        assert_eq!(Trajectory::default().peak_abs(), 0.0);
    }

    #[test]
    fn ensure_finite_reports_first_bad_index() {
        let a = Trajectory::from(vec![0.0, 1.0, f64::NAN, f64::INFINITY]);
        assert_eq!(
            a.ensure_finite("spring"),
            Err(PipelineError::NonFinite {
                stage: "spring",
                index: 2
            })
        );
        assert!(Trajectory::zeros(4).ensure_finite("spring").is_ok());
    }

    #[test]
    fn keep_window_drops_both_ends() {
        let mut a: Trajectory = (0..10).map(|i| i as f64).collect();
        a.keep_window(2..7);
        assert_eq!(a.as_slice(), &[2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
