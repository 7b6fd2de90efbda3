//! # posejob-schema — Input Schema Validation
//!
//! Ships `pose-job.schema.json` (Draft 2020-12, `additionalProperties: false`)
//! and a [`SchemaValidator`] that checks JSON or YAML documents against it.
//!
//! The schema check is an outer trust boundary: it reports every violation
//! in a document at once, with instance and schema paths, so a caller can
//! fix a request in one pass. It does not decide whether blob locations can
//! be derived; that remains the job of `posejob_core::PoseJob::build`.

pub mod validate;

pub use validate::{
    load_document, parse_document, DocumentFormat, SchemaValidationError, SchemaValidator,
    ValidationViolations, Violation, POSE_JOB_SCHEMA_NAME,
};
