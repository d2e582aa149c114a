//! Pipeline error types.
//!
//! Every failure is a configuration or programming error caught before
//! or during the single offline run; none is retried.

use thiserror::Error;

use crate::config::ConfigError;

/// Error type for pipeline stages.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    /// Degenerate parameters (e.g. a filter window shorter than one sample).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Trajectories combined or trimmed together have different lengths.
    #[error("{context}: length mismatch (expected {expected}, got {actual})")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A stage produced a NaN or infinite sample.
    #[error("{stage} produced a non-finite sample at index {index}")]
    NonFinite { stage: &'static str, index: usize },

    /// Loading or validating the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Shorthand for [`PipelineError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_message_names_context() {
        let e = PipelineError::LengthMismatch {
            context: "deviation",
            expected: 10,
            actual: 9,
        };
        assert_eq!(
            e.to_string(),
            "deviation: length mismatch (expected 10, got 9)"
        );
    }

    #[test]
    fn config_error_converts() {
        let e: PipelineError = ConfigError::FileNotFound.into();
        assert!(matches!(e, PipelineError::Config(ConfigError::FileNotFound)));
    }
}
