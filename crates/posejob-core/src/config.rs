//! Defaults applied when a record is built.
//!
//! The default bucket and model version can be overridden through the
//! environment for deployments that write to a different bucket.

use crate::error::ConfigError;

/// Bucket used for derived and bucket-less blob locations.
pub const DEFAULT_BUCKET: &str = "pose-platform-output";

/// Model version stamped on records that do not supply one.
pub const DEFAULT_MODEL_VERSION: &str = "2.0.2";

/// Static defaults for record construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefaults {
    /// Default bucket name.
    pub bucket: String,
    /// Default model version.
    pub model_version: String,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
        }
    }
}

impl JobDefaults {
    /// Load defaults from environment variables.
    ///
    /// Variables:
    /// - `POSEJOB_DEFAULT_BUCKET` (default: [`DEFAULT_BUCKET`])
    /// - `POSEJOB_MODEL_VERSION` (default: [`DEFAULT_MODEL_VERSION`])
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyValue`] if a variable is set but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: env_or("POSEJOB_DEFAULT_BUCKET", DEFAULT_BUCKET)?,
            model_version: env_or("POSEJOB_MODEL_VERSION", DEFAULT_MODEL_VERSION)?,
        })
    }
}

fn env_or(var: &str, default: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(var.to_string())),
        Ok(value) => Ok(value),
        Err(_) => Ok(default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let defaults = JobDefaults::default();
        assert_eq!(defaults.bucket, DEFAULT_BUCKET);
        assert_eq!(defaults.model_version, "2.0.2");
    }

    #[test]
    fn env_or_uses_default_when_var_absent() {
        let value = env_or("POSEJOB_TEST_UNSET_VAR_31337", "fallback").unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn env_or_reads_set_var() {
        std::env::set_var("POSEJOB_TEST_SET_VAR", "custom-bucket");
        let value = env_or("POSEJOB_TEST_SET_VAR", "fallback");
        std::env::remove_var("POSEJOB_TEST_SET_VAR");
        assert_eq!(value.unwrap(), "custom-bucket");
    }

    #[test]
    fn env_or_rejects_empty_value() {
        std::env::set_var("POSEJOB_TEST_EMPTY_VAR", "  ");
        let result = env_or("POSEJOB_TEST_EMPTY_VAR", "fallback");
        std::env::remove_var("POSEJOB_TEST_EMPTY_VAR");
        assert_eq!(
            result,
            Err(ConfigError::EmptyValue("POSEJOB_TEST_EMPTY_VAR".to_string()))
        );
    }
}
