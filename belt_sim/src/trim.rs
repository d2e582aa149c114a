//! Symmetric margin trimming.
//!
//! Filter edges and integrator warm-up leave artifacts at both ends of
//! every derived trajectory. Before reporting, each trajectory of a group
//! is cut down to the same window:
//!
//! ```text
//! drop = round(margin / dt)
//! keep = L - round(2·margin / dt)
//! window = [drop, drop + keep)
//! ```

use core::ops::Range;

use belt_common::error::PipelineError;

use crate::timebase::TimeBase;
use crate::trajectory::Trajectory;

/// Removes a fixed time margin from both ends of a trajectory group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trimmer {
    /// Samples removed at the start.
    drop: usize,
    /// Total samples removed.
    cut: usize,
}

impl Trimmer {
    /// Trimmer for `margin_time` seconds on the given grid.
    pub fn new(timebase: &TimeBase, margin_time: f64) -> Self {
        Self {
            drop: timebase.time_to_index(margin_time),
            cut: timebase.time_to_index(2.0 * margin_time),
        }
    }

    /// Kept window for a reference length `len`.
    pub fn window(&self, len: usize) -> Result<Range<usize>, PipelineError> {
        if self.cut > len {
            return Err(PipelineError::configuration(format!(
                "margin of {} samples exceeds trajectory length {len}",
                self.cut
            )));
        }
        Ok(self.drop..self.drop + (len - self.cut))
    }

    /// Trim every trajectory of `group` to the window of the first one.
    ///
    /// All trajectories must have the same length; a mismatch is reported
    /// and nothing is modified.
    pub fn trim_all(&self, group: &mut [&mut Trajectory]) -> Result<(), PipelineError> {
        let Some(first) = group.first() else {
            return Ok(());
        };
        let reference = first.len();
        for t in group.iter() {
            if t.len() != reference {
                return Err(PipelineError::LengthMismatch {
                    context: "trim",
                    expected: reference,
                    actual: t.len(),
                });
            }
        }
        let window = self.window(reference)?;
        for t in group.iter_mut() {
            t.keep_window(window.clone());
        }
        Ok(())
    }
}
