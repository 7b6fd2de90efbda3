//! # Bearer Credential Check
//!
//! An [`AuthorizationHeader`] can only be constructed from a value equal to
//! `Bearer <secret>`, compared in constant time. Anything else is rejected
//! with [`AuthorizationError::InvalidBearerToken`], whose message carries
//! the rejected value verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use subtle::ConstantTimeEq;

use crate::error::{AuthorizationError, ConfigError};

/// The shared secret that bearer tokens are checked against.
///
/// Custom `Debug` redacts the secret so it cannot leak through log output.
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl AuthConfig {
    /// Create a configuration from an explicit secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyValue`] for an empty secret.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyValue("auth secret".to_string()));
        }
        Ok(Self { secret })
    }

    /// Load the secret from `POSEJOB_AUTH_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("POSEJOB_AUTH_SECRET")
            .map_err(|_| ConfigError::MissingVariable("POSEJOB_AUTH_SECRET".to_string()))?;
        Self::new(secret).map_err(|_| ConfigError::EmptyValue("POSEJOB_AUTH_SECRET".to_string()))
    }

    fn expected_header(&self) -> String {
        format!("Bearer {}", self.secret)
    }
}

/// A validated `Authorization` header value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationHeader {
    #[serde(rename = "Authorization")]
    authorization: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHeader {
    #[serde(rename = "Authorization")]
    authorization: String,
}

impl AuthorizationHeader {
    /// Validate a raw header value against `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::InvalidBearerToken`] if the value is not
    /// exactly `Bearer <secret>`.
    pub fn new(value: impl Into<String>, config: &AuthConfig) -> Result<Self, AuthorizationError> {
        let value = value.into();
        if constant_time_eq(&value, &config.expected_header()) {
            Ok(Self {
                authorization: value,
            })
        } else {
            tracing::warn!("rejecting invalid bearer token");
            Err(AuthorizationError::InvalidBearerToken { value })
        }
    }

    /// Validate a header mapping of the form `{"Authorization": "..."}`.
    pub fn from_value(value: Value, config: &AuthConfig) -> Result<Self, AuthorizationError> {
        let raw: RawHeader = serde_json::from_value(value)
            .map_err(|e| AuthorizationError::Malformed(e.to_string()))?;
        Self::new(raw.authorization, config)
    }

    /// The accepted header value.
    pub fn as_str(&self) -> &str {
        &self.authorization
    }
}

/// Constant-time comparison. When lengths differ, a dummy comparison keeps
/// timing independent of where the mismatch is.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> AuthConfig {
        AuthConfig::new("SECRET_KEY").unwrap()
    }

    #[test]
    fn accepts_matching_bearer() {
        let header = AuthorizationHeader::new("Bearer SECRET_KEY", &config()).unwrap();
        assert_eq!(header.as_str(), "Bearer SECRET_KEY");
    }

    #[test]
    fn rejects_wrong_secret_and_echoes_value() {
        let err = AuthorizationHeader::new("Bearer WRONG", &config()).unwrap_err();
        assert_eq!(
            err,
            AuthorizationError::InvalidBearerToken {
                value: "Bearer WRONG".to_string()
            }
        );
        assert!(err.to_string().contains("value=Bearer WRONG"));
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(AuthorizationHeader::new("SECRET_KEY", &config()).is_err());
        assert!(AuthorizationHeader::new("bearer SECRET_KEY", &config()).is_err());
    }

    #[test]
    fn mapping_round_trips_through_serialization() {
        let input = json!({"Authorization": "Bearer SECRET_KEY"});
        let header = AuthorizationHeader::from_value(input.clone(), &config()).unwrap();
        assert_eq!(serde_json::to_value(&header).unwrap(), input);
    }

    #[test]
    fn mapping_with_extra_field_is_malformed() {
        let err = AuthorizationHeader::from_value(
            json!({"Authorization": "Bearer SECRET_KEY", "X-Trace": "1"}),
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, AuthorizationError::Malformed(_)));
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("SECRET_KEY"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn empty_secret_rejected() {
        assert!(AuthConfig::new("").is_err());
    }

    #[test]
    fn constant_time_eq_basics() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
    }
}
