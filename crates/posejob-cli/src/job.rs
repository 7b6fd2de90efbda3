//! # Build Subcommand
//!
//! Reads an input mapping, runs the schema check, constructs the record and
//! prints its mapping view as JSON.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use posejob_core::{JobDefaults, JobError, PoseJob, Timestamp};
use posejob_schema::{
    load_document, parse_document, DocumentFormat, SchemaValidationError, SchemaValidator,
};

/// Arguments for the `posejob build` subcommand.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Input document (JSON, or YAML for .yaml/.yml). Reads stdin when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Set or override the job identifier in the input.
    #[arg(long)]
    pub id: Option<i64>,

    /// Parse stdin as YAML instead of JSON.
    #[arg(long)]
    pub yaml: bool,

    /// Skip the schema check and rely on the record constructor alone.
    #[arg(long, conflicts_with = "schema")]
    pub skip_schema: bool,

    /// Validate against this schema file instead of the embedded one.
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Pretty-print the resulting record.
    #[arg(long)]
    pub pretty: bool,
}

/// Result of building a record from a document.
#[derive(Debug)]
pub enum BuildOutcome {
    /// The record was built.
    Built(PoseJob),
    /// The schema check rejected the document.
    SchemaRejected(SchemaValidationError),
    /// The record constructor rejected the document.
    ConstructionRejected(JobError),
}

/// Execute the build subcommand.
///
/// Returns exit code: 0 on success, 1 when the document is rejected.
pub fn run_build(args: &BuildArgs) -> Result<u8> {
    let defaults = JobDefaults::from_env().context("invalid job defaults in environment")?;
    let document = read_input(args)?;

    match build_document(document, args, &defaults, Timestamp::now())? {
        BuildOutcome::Built(job) => {
            let map = Value::Object(job.to_map());
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&map)
            } else {
                serde_json::to_string(&map)
            }
            .context("failed to render record")?;
            println!("{rendered}");
            Ok(0)
        }
        BuildOutcome::SchemaRejected(e) => {
            eprintln!("FAIL: {e}");
            Ok(1)
        }
        BuildOutcome::ConstructionRejected(e) => {
            eprintln!("FAIL: {e}");
            Ok(1)
        }
    }
}

/// Load the input document from the file argument or stdin.
pub fn read_input(args: &BuildArgs) -> Result<Value> {
    match &args.file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading pose job document");
            load_document(path).with_context(|| format!("failed to load {}", path.display()))
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            let format = if args.yaml {
                DocumentFormat::Yaml
            } else {
                DocumentFormat::Json
            };
            parse_document(&content, format).context("failed to parse stdin")
        }
    }
}

/// Apply `--id`, run the schema check unless skipped, and construct.
pub fn build_document(
    mut document: Value,
    args: &BuildArgs,
    defaults: &JobDefaults,
    now: Timestamp,
) -> Result<BuildOutcome> {
    if let (Some(id), Some(fields)) = (args.id, document.as_object_mut()) {
        fields.insert("id".to_string(), Value::from(id));
    }

    if !args.skip_schema {
        let validator = match &args.schema {
            Some(path) => SchemaValidator::from_file(path)
                .with_context(|| format!("failed to compile schema {}", path.display()))?,
            None => SchemaValidator::pose_job().context("failed to compile input schema")?,
        };
        match validator.validate_document(&document) {
            Ok(()) => {}
            Err(e @ SchemaValidationError::ValidationFailed { .. }) => {
                return Ok(BuildOutcome::SchemaRejected(e));
            }
            Err(other) => return Err(other).context("schema check failed"),
        }
    }

    match PoseJob::from_value_with(document, defaults, now) {
        Ok(job) => {
            tracing::info!(id = ?job.id(), video = %job.output_blob_info_video(), "built pose job");
            Ok(BuildOutcome::Built(job))
        }
        Err(e) => Ok(BuildOutcome::ConstructionRejected(e)),
    }
}
