//! # Belt Sim Library
//!
//! Offline simulation of belt-driven motion. The belt between motor and
//! print head is modelled as a damped spring; commanded positions are
//! pre-distorted by a compensation filter so that the simulated head
//! follows the commanded path more closely.
//!
//! ## Stages
//!
//! 1. **profile** — move list → commanded positions (order 2/4/6 kernels)
//! 2. **filters** — commanded positions → compensated positions
//! 3. **spring** — commanded positions → estimated head positions
//! 4. **derivative** — backward-difference velocity and acceleration
//! 5. **trim** — drop warm-up and run-out samples from every series
//!
//! [`pipeline::Pipeline`] wires the stages together and returns a
//! [`pipeline::MotionBundle`].

pub mod derivative;
pub mod filters;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod spring;
pub mod timebase;
pub mod trajectory;
pub mod trim;

pub use pipeline::{DeviationSummary, MotionBundle, Pipeline};
pub use trajectory::Trajectory;
