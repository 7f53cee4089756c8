//! Error types.
//!
//! Only configuration can fail. Everything that happens inside a frame step
//! (zero-length sweeps, rays that hit nothing) is a normal outcome, not an error.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration value the controller cannot run with.
///
/// Returned by [`BoxControllerConfig::validate`](crate::config::BoxControllerConfig::validate)
/// and [`BoxBody::init`](crate::body::BoxBody::init). A body whose config is
/// rejected is never stepped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("box half extents must be positive and finite, got ({x}, {y})")]
    InvalidHalfExtents { x: f32, y: f32 },

    #[error("at least 2 ray samples per edge are required, got {0}")]
    TooFewSamples(usize),

    #[error("overshoot factor must be greater than 1.0, got {0}")]
    InvalidOvershoot(f32),

    #[error("{name} must be positive and finite, got {value}")]
    InvalidDuration { name: &'static str, value: f32 },

    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidSpeed { name: &'static str, value: f32 },
}

/// Failure while reading a controller config from disk or from a RON string.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse controller config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_name_the_field() {
        let err = ConfigError::InvalidDuration {
            name: "jump_duration",
            value: 0.0,
        };
        assert_eq!(err.to_string(), "jump_duration must be positive and finite, got 0");

        let err = ConfigError::TooFewSamples(1);
        assert!(err.to_string().contains("got 1"));
    }

    #[test]
    fn load_error_wraps_validation_failure() {
        let err = ConfigLoadError::from(ConfigError::InvalidOvershoot(1.0));
        assert!(matches!(err, ConfigLoadError::Invalid(ConfigError::InvalidOvershoot(_))));
        assert_eq!(err.to_string(), "overshoot factor must be greater than 1.0, got 1");
    }
}
