//! # Error Hierarchy
//!
//! Structured error types for pose job construction, built with `thiserror`.
//!
//! Every failure is raised synchronously at construction time. There is no
//! retry and no partially-built record: callers either get a complete
//! [`PoseJob`](crate::PoseJob) or one of these errors, and translate it into
//! their own transport representation.

use thiserror::Error;

use crate::job::DerivedField;

/// Errors raised while constructing a [`PoseJob`](crate::PoseJob).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The input did not conform to the record schema: unknown field,
    /// wrong type, invalid enumerated value, or a non-object document.
    #[error(
        "schema violation{}: {reason}",
        .field.as_deref().map(|f| format!(" at `{f}`")).unwrap_or_default()
    )]
    SchemaViolation {
        /// Path of the offending field (e.g. `id`, `outputBlobInfoVideo.name`),
        /// or `None` when the violation concerns the document as a whole.
        field: Option<String>,
        /// Description of the violation.
        reason: String,
    },

    /// A derivable field was omitted and the identifier needed to derive
    /// it was omitted as well.
    #[error("\"id\" is required when \"{field}\" is not provided")]
    MissingIdentifier {
        /// The first derivable field that could not be resolved.
        field: DerivedField,
    },
}

impl JobError {
    /// Build a [`JobError::SchemaViolation`] about the document as a whole.
    pub fn schema(reason: impl std::fmt::Display) -> Self {
        Self::SchemaViolation {
            field: None,
            reason: reason.to_string(),
        }
    }

    /// Build a [`JobError::SchemaViolation`] about one field.
    pub fn schema_at(field: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::SchemaViolation {
            field: Some(field.into()),
            reason: reason.to_string(),
        }
    }

    /// The offending field of a schema violation, if one is known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation { field, .. } => field.as_deref(),
            Self::MissingIdentifier { field } => Some(field.wire_name()),
        }
    }
}

/// Errors raised when a bearer credential does not match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The `Authorization` value is not `Bearer <secret>`.
    ///
    /// The message echoes the rejected value. Callers that forward this
    /// message to untrusted parties or logs should redact it first.
    #[error("the Bearer token provided was invalid. value={value}")]
    InvalidBearerToken {
        /// The rejected header value, verbatim.
        value: String,
    },

    /// The header document itself was malformed.
    #[error("malformed authorization header: {0}")]
    Malformed(String),
}

/// Configuration errors for defaults and credentials read from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration value was present but empty.
    #[error("{0} must not be empty")]
    EmptyValue(String),

    /// A required environment variable is not set.
    #[error("{0} environment variable is required")]
    MissingVariable(String),
}
