//! Session configuration.
//!
//! Configuration is plain data: it can be built in code, or loaded from a
//! JSON document. Validation uses Stillwater's `Validation` so a broken
//! config reports every violation at once instead of the first one.
//!
//! # Example
//!
//! ```rust
//! use stepwise::config::SessionConfig;
//! use stepwise::core::Retention;
//!
//! let config = SessionConfig::from_json(
//!     r#"{ "retention": { "policy": "checkpoints", "interval": 32 }, "resume_limit": 10000 }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.retention, Retention::Checkpoints { interval: 32 });
//! assert_eq!(config.resume_limit, Some(10_000));
//! ```

pub mod error;

pub use error::{ConfigError, ConfigViolation};

use crate::core::Retention;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Tunables for a debugger session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Which intermediate terms the history store keeps
    pub retention: Retention,

    /// Maximum steps a single `resume` call may replay; `None` runs until
    /// the engine halts
    pub resume_limit: Option<u64>,
}

impl SessionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded session config");
        Self::from_json(&json)
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        if let Retention::Checkpoints { interval: 0 } = self.retention {
            checks.push(Validation::fail(ConfigViolation::ZeroCheckpointInterval));
        }

        if self.resume_limit == Some(0) {
            checks.push(Validation::fail(ConfigViolation::ZeroResumeLimit));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Return the config unchanged if it is valid.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(violations) => Err(ConfigError::Invalid(
                violations.iter().cloned().collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.retention, Retention::Unbounded);
        assert!(config.resume_limit.is_none());
        assert!(config.validate().is_success());
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let config = SessionConfig {
            retention: Retention::Checkpoints { interval: 0 },
            resume_limit: Some(0),
        };

        match config.validate() {
            Validation::Failure(violations) => {
                assert_eq!(violations.len(), 2);
                assert!(violations
                    .iter()
                    .any(|v| *v == ConfigViolation::ZeroCheckpointInterval));
                assert!(violations
                    .iter()
                    .any(|v| *v == ConfigViolation::ZeroResumeLimit));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn from_json_rejects_invalid_values() {
        let err = SessionConfig::from_json(
            r#"{ "retention": { "policy": "checkpoints", "interval": 0 } }"#,
        )
        .unwrap_err();

        match err {
            ConfigError::Invalid(violations) => {
                assert_eq!(violations, vec![ConfigViolation::ZeroCheckpointInterval]);
            }
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn from_json_rejects_unknown_fields() {
        let err = SessionConfig::from_json(r#"{ "breakpoints": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = SessionConfig::from_path("/nonexistent/stepwise.json").unwrap_err();
        match err {
            ConfigError::Read { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/stepwise.json"));
            }
            other => panic!("Expected Read, got {other:?}"),
        }
    }

    #[test]
    fn from_path_loads_file() {
        let path = std::env::temp_dir()
            .join(format!("stepwise-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "resume_limit": 500 }"#).unwrap();

        let config = SessionConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.resume_limit, Some(500));
        assert_eq!(config.retention, Retention::Unbounded);
    }

    #[test]
    fn invalid_error_lists_every_violation() {
        let err = ConfigError::Invalid(vec![
            ConfigViolation::ZeroCheckpointInterval,
            ConfigViolation::ZeroResumeLimit,
        ]);
        let message = err.to_string();
        assert!(message.contains("checkpoint interval"));
        assert!(message.contains("resume limit"));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = SessionConfig {
            retention: Retention::Checkpoints { interval: 8 },
            resume_limit: Some(64),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }
}
