//! Belt Common Library
//!
//! Shared constants, model types, error types and configuration loading
//! for the belt resonance simulator.
//!
//! # Module Structure
//!
//! - [`consts`] - Reference model constants and validation bounds
//! - [`model`] - Move segments, spring model, kernel/filter selection
//! - [`error`] - Pipeline error type
//! - [`config`] - TOML configuration loading
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod consts;
pub mod error;
pub mod model;
pub mod prelude;
