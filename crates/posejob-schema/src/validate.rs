//! # Schema Validation
//!
//! Runtime validation of pose job input documents against the embedded
//! JSON Schema (Draft 2020-12).
//!
//! Documents that fail validation are rejected with one [`Violation`] per
//! problem: the instance path of the offending value, the schema path that
//! rejected it, and a readable message.
//!
//! The embedded schema has only internal `$ref`s (`#/$defs/...`), resolved
//! natively by the `jsonschema` crate. No network access happens.

use std::fmt;
use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

/// File name of the embedded pose job input schema.
pub const POSE_JOB_SCHEMA_NAME: &str = "pose-job.schema.json";

const POSE_JOB_SCHEMA: &str = include_str!("../schemas/pose-job.schema.json");

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema could not be read or parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The document could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path (or `-` for stdin) of the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// True if any violation points at `instance_path` or below it.
    pub fn touches(&self, instance_path: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.instance_path.starts_with(instance_path))
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Document encodings accepted by [`parse_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON.
    Json,
    /// YAML (JSON-compatible subset).
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from a file extension; anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// A compiled validator for one schema.
///
/// Compilation happens once at construction; the validator is `Send + Sync`
/// and can be shared across threads.
pub struct SchemaValidator {
    schema_name: String,
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_name", &self.schema_name)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile the embedded pose job input schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaLoadError` or `ValidatorBuildError` only if the
    /// embedded schema is itself broken.
    pub fn pose_job() -> Result<Self, SchemaValidationError> {
        let schema: Value = serde_json::from_str(POSE_JOB_SCHEMA).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                schema_name: POSE_JOB_SCHEMA_NAME.to_string(),
                reason: format!("invalid JSON: {e}"),
            }
        })?;
        Self::compile(POSE_JOB_SCHEMA_NAME, &schema)
    }

    /// Compile a schema loaded from a file on disk.
    ///
    /// Used to validate against a deployment-specific copy of the schema
    /// instead of the embedded one.
    pub fn from_file(path: &Path) -> Result<Self, SchemaValidationError> {
        let schema_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(POSE_JOB_SCHEMA_NAME)
            .to_string();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                schema_name: schema_name.clone(),
                reason: format!("cannot read file: {e}"),
            }
        })?;
        let schema: Value = serde_json::from_str(&content).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                schema_name: schema_name.clone(),
                reason: format!("invalid JSON: {e}"),
            }
        })?;
        Self::compile(&schema_name, &schema)
    }

    fn compile(schema_name: &str, schema: &Value) -> Result<Self, SchemaValidationError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.should_validate_formats(true);
        let validator = opts.build(schema).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            }
        })?;
        tracing::debug!(schema = schema_name, "compiled schema validator");
        Ok(Self {
            schema_name: schema_name.to_string(),
            validator,
        })
    }

    /// Name of the schema this validator enforces.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Validate a parsed document, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with structured
    /// violation details if the document is invalid.
    pub fn validate_document(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                schema = %self.schema_name,
                count = violations.len(),
                "document failed schema validation"
            );
            Err(SchemaValidationError::ValidationFailed {
                schema_name: self.schema_name.clone(),
                violations: ValidationViolations { violations },
            })
        }
    }

    /// Load a JSON or YAML document from disk and validate it.
    ///
    /// Returns the parsed document so the caller can go on to build a
    /// record from it without reading the file twice.
    pub fn validate_file(&self, path: &Path) -> Result<Value, SchemaValidationError> {
        let document = load_document(path)?;
        self.validate_document(&document)
            .map_err(|e| match e {
                SchemaValidationError::ValidationFailed { violations, .. } => {
                    SchemaValidationError::ValidationFailed {
                        schema_name: format!("{} ({})", self.schema_name, path.display()),
                        violations,
                    }
                }
                other => other,
            })?;
        Ok(document)
    }
}

/// Read a document from disk, choosing JSON or YAML by extension.
pub fn load_document(path: &Path) -> Result<Value, SchemaValidationError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SchemaValidationError::DocumentLoadError {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        }
    })?;
    parse_document(&content, DocumentFormat::from_path(path)).map_err(|e| match e {
        SchemaValidationError::DocumentLoadError { reason, .. } => {
            SchemaValidationError::DocumentLoadError {
                path: path.display().to_string(),
                reason,
            }
        }
        other => other,
    })
}

/// Parse document text in the given format.
///
/// YAML documents are converted into the equivalent JSON value tree; YAML
/// features outside the JSON data model (non-string keys, tags) are errors.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, SchemaValidationError> {
    let parsed = match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}")),
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}")),
    };
    parsed.map_err(|reason| SchemaValidationError::DocumentLoadError {
        path: "-".to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> SchemaValidator {
        SchemaValidator::pose_job().unwrap()
    }

    fn violations_of(doc: Value) -> ValidationViolations {
        match validator().validate_document(&doc).unwrap_err() {
            SchemaValidationError::ValidationFailed { violations, .. } => violations,
            other => panic!("Expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn embedded_schema_compiles() {
        assert_eq!(validator().schema_name(), POSE_JOB_SCHEMA_NAME);
    }

    #[test]
    fn accepts_minimal_document() {
        validator().validate_document(&json!({"id": 42})).unwrap();
    }

    #[test]
    fn accepts_full_document() {
        let doc = json!({
            "id": 42,
            "kind": "pose_job",
            "modelVersion": "2.0.2",
            "createdAt": "2026-10-16T08:15:00Z",
            "updatedAt": "2026-10-16T08:15:00.5Z",
            "outputBlobInfoVideo": {"name": "42/video.mp4", "bucket": "b"},
            "outputBlobInfoPoseData": {"name": "42/data.json"},
            "userIP": "10.1.2.3",
            "userHostname": null
        });
        validator().validate_document(&doc).unwrap();
    }

    #[test]
    fn rejects_additional_properties() {
        let violations = violations_of(json!({"id": 1, "priority": "high"}));
        assert!(violations
            .violations()
            .iter()
            .any(|v| v.message.contains("priority")));
    }

    #[test]
    fn rejects_string_id() {
        let violations = violations_of(json!({"id": "42"}));
        assert!(violations.touches("/id"));
    }

    #[test]
    fn rejects_unknown_kind() {
        let violations = violations_of(json!({"id": 1, "kind": "video_job"}));
        assert!(violations.touches("/kind"));
    }

    #[test]
    fn rejects_offset_timestamp() {
        let violations = violations_of(json!({"id": 1, "createdAt": "2026-10-16T08:15:00+02:00"}));
        assert!(violations.touches("/createdAt"));
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        let violations = violations_of(json!({"id": 1, "createdAt": "2026-02-30T00:00:00Z"}));
        assert!(violations.touches("/createdAt"));
    }

    #[test]
    fn accepts_leap_day() {
        validator()
            .validate_document(&json!({"id": 1, "updatedAt": "2028-02-29T23:59:59Z"}))
            .unwrap();
    }

    #[test]
    fn id_bounded_to_signed_64_bit() {
        validator()
            .validate_document(&json!({"id": i64::MAX}))
            .unwrap();
        validator()
            .validate_document(&json!({"id": i64::MIN}))
            .unwrap();
        let violations = violations_of(json!({"id": (i64::MAX as u64) + 1}));
        assert!(violations.touches("/id"));
    }

    #[test]
    fn accepts_integral_float_id() {
        validator().validate_document(&json!({"id": 42.0})).unwrap();
        let violations = violations_of(json!({"id": 42.5}));
        assert!(violations.touches("/id"));
    }

    #[test]
    fn rejects_blob_without_name() {
        let violations = violations_of(json!({"id": 1, "outputBlobInfoVideo": {"bucket": "b"}}));
        assert!(violations.touches("/outputBlobInfoVideo"));
    }

    #[test]
    fn reports_every_violation() {
        let violations = violations_of(json!({
            "id": "x",
            "kind": "other",
            "extra": 1
        }));
        assert!(violations.len() >= 3, "got: {violations}");
    }

    #[test]
    fn schema_does_not_require_id() {
        // Derivation rules are enforced by the record constructor, not here.
        validator().validate_document(&json!({})).unwrap();
    }

    #[test]
    fn rejects_non_object_root() {
        let violations = violations_of(json!([1, 2]));
        assert!(!violations.is_empty());
    }

    #[test]
    fn parse_yaml_document() {
        let doc = parse_document(
            "id: 42\noutputBlobInfoVideo:\n  name: clip.mp4\n",
            DocumentFormat::Yaml,
        )
        .unwrap();
        assert_eq!(doc["id"], 42);
        assert_eq!(doc["outputBlobInfoVideo"]["name"], "clip.mp4");
    }

    #[test]
    fn parse_invalid_json_is_document_error() {
        let err = parse_document("{not json", DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, SchemaValidationError::DocumentLoadError { .. }));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("job.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("job.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("job.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("job")), DocumentFormat::Json);
    }

    #[test]
    fn violation_display_format() {
        let v = Violation {
            instance_path: "/id".to_string(),
            schema_path: "/properties/id/type".to_string(),
            message: r#""42" is not of types "integer", "null""#.to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("/id"));
        assert!(display.contains("is not of types"));
    }

    #[test]
    fn violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/additionalProperties".to_string(),
            message: "Additional properties are not allowed".to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }
}
