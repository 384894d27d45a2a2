//! Error types for kinesim.
//!
//! The per-tick physics path never fails: inputs are clamped, not rejected.
//! Errors only surface while building a scenario (configuration, world
//! setup) or at the presentation boundary (unknown scenario identifiers,
//! file and serialization I/O).

use thiserror::Error;

/// Result type alias for kinesim operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all kinesim operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Field-level validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== World Setup Errors =====
    /// A world must contain exactly one ground body.
    #[error("World setup error: expected exactly one ground body, found {found}")]
    GroundCount {
        /// Number of ground bodies supplied.
        found: usize,
    },

    // ===== Presentation Errors =====
    /// Unknown scenario identifier.
    #[error("Scenario not found: {name}")]
    ScenarioNotFound {
        /// Identifier that was requested.
        name: String,
    },

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a scenario-not-found error.
    #[must_use]
    pub fn scenario_not_found(name: impl Into<String>) -> Self {
        Self::ScenarioNotFound { name: name.into() }
    }

    /// Whether this error comes from a bad configuration rather than I/O.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::YamlParse(_) | Self::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_config() {
        let err = SimError::config("dt must be positive");
        assert!(err.is_config_error());
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("dt must be positive"));
    }

    #[test]
    fn test_error_ground_count_display() {
        let err = SimError::GroundCount { found: 2 };
        assert!(!err.is_config_error());
        let msg = err.to_string();
        assert!(msg.contains("exactly one ground body"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_error_scenario_not_found() {
        let err = SimError::scenario_not_found("egik-atis");
        assert!(!err.is_config_error());
        assert_eq!(err.to_string(), "Scenario not found: egik-atis");
    }

    #[test]
    fn test_error_from_yaml() {
        let parse: Result<u32, _> = serde_yaml::from_str("{{{{not yaml");
        let err = SimError::from(parse.unwrap_err());
        assert!(err.is_config_error());
        assert!(err.to_string().contains("YAML parsing error"));
    }

    #[test]
    fn test_error_from_io() {
        let err = SimError::from(std::io::Error::other("disk gone"));
        assert!(!err.is_config_error());
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_error_from_json() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err = SimError::from(parse.unwrap_err());
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_debug() {
        let err = SimError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
