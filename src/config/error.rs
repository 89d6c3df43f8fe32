//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// A single rule broken by a [`SessionConfig`](super::SessionConfig).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("checkpoint interval must be greater than zero")]
    ZeroCheckpointInterval,

    #[error("resume limit must be greater than zero")]
    ZeroResumeLimit,
}

/// Errors that can occur while loading a session configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Every violation found, not just the first
    #[error("invalid config: {}", join(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
