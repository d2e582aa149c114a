//! Backward-difference derivative.
//!
//! ```text
//! out[0] = 0
//! out[i] = (seq[i] - seq[i-1]) · rate      i ≥ 1
//! ```
//!
//! Applied once for velocity and twice for acceleration. No smoothing.

use crate::timebase::TimeBase;
use crate::trajectory::Trajectory;

/// Discrete first derivative of `seq`, same length as the input.
pub fn derivative(seq: &[f64], timebase: &TimeBase) -> Trajectory {
    let rate = timebase.rate();
    let mut out = Trajectory::zeros(seq.len());
    for (o, w) in out.as_mut_slice().iter_mut().skip(1).zip(seq.windows(2)) {
        *o = (w[1] - w[0]) * rate;
    }
    out
}
