//! # Pose Job Records
//!
//! [`PoseJob`] is built through exactly one path, [`PoseJob::build`], which
//! every other entry point ([`PoseJob::from_value`], [`PoseJob::from_map`],
//! [`PoseJobBuilder`]) funnels into:
//!
//! 1. The input is parsed into [`PoseJobInput`]. Unknown fields, wrong
//!    types and non-member `kind` values are rejected here, with the
//!    offending field's path carried in [`JobError::SchemaViolation`].
//! 2. Static defaults fill `kind`, `modelVersion`, `createdAt` and
//!    `updatedAt`. The clock is read once by the caller and passed in.
//! 3. Each [`DerivedField`] is resolved in declaration order: a supplied
//!    value is kept, otherwise it is synthesized from `id`, otherwise the
//!    build fails with [`JobError::MissingIdentifier`].
//!
//! The two derivable fields are checked independently. A caller supplying
//! the video location but neither `id` nor the pose-data location is still
//! rejected, naming `outputBlobInfoPoseData`.
//!
//! `PoseJob` deliberately does not implement `Deserialize`: the only way to
//! obtain one is through the validating constructor.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use crate::blob::{BlobInfo, BlobInfoInput};
use crate::config::JobDefaults;
use crate::error::JobError;
use crate::kind::JobKind;
use crate::temporal::Timestamp;

/// A record field that may be synthesized from the job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedField {
    /// `outputBlobInfoVideo`, derived as `{id}/video.mp4`.
    OutputBlobInfoVideo,
    /// `outputBlobInfoPoseData`, derived as `{id}/data.json`.
    OutputBlobInfoPoseData,
}

impl DerivedField {
    /// All derivable fields, in the order they are resolved.
    pub const ALL: [DerivedField; 2] = [Self::OutputBlobInfoVideo, Self::OutputBlobInfoPoseData];

    /// The field's name in the mapping view.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::OutputBlobInfoVideo => "outputBlobInfoVideo",
            Self::OutputBlobInfoPoseData => "outputBlobInfoPoseData",
        }
    }

    /// Object name suffix appended to the identifier.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::OutputBlobInfoVideo => "video.mp4",
            Self::OutputBlobInfoPoseData => "data.json",
        }
    }

    /// Synthesize this field's location for job `id` in `bucket`.
    pub fn derive(&self, id: i64, bucket: &str) -> BlobInfo {
        BlobInfo::new(format!("{id}/{}", self.file_name()), bucket)
    }
}

impl std::fmt::Display for DerivedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Caller-supplied fields of a pose job. Every field is optional; unknown
/// fields are rejected.
///
/// An explicit JSON `null` is treated the same as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PoseJobInput {
    /// Job identifier. Integral floats such as `42.0` are accepted.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<i64>,
    /// Kind tag; must be a [`JobKind`] member.
    pub kind: Option<JobKind>,
    /// Model version string.
    pub model_version: Option<String>,
    /// Creation time.
    pub created_at: Option<Timestamp>,
    /// Last update time.
    pub updated_at: Option<Timestamp>,
    /// Where the rendered video is written.
    pub output_blob_info_video: Option<BlobInfoInput>,
    /// Where the pose data is written.
    pub output_blob_info_pose_data: Option<BlobInfoInput>,
    /// Address of the requesting client.
    #[serde(rename = "userIP")]
    pub user_ip: Option<String>,
    /// Hostname of the requesting client.
    pub user_hostname: Option<String>,
}

impl PoseJobInput {
    /// Wire names of every accepted input field.
    pub const FIELDS: [&'static str; 9] = [
        "id",
        "kind",
        "modelVersion",
        "createdAt",
        "updatedAt",
        "outputBlobInfoVideo",
        "outputBlobInfoPoseData",
        "userIP",
        "userHostname",
    ];
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(id) = number.as_i64() {
        return Ok(Some(id));
    }
    // 2^63 is exactly representable; `i64::MAX as f64` rounds up to it.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && (-BOUND..BOUND).contains(&f) => Ok(Some(f as i64)),
        _ => Err(serde::de::Error::custom(format!(
            "id must be an integer in the signed 64-bit range, got {number}"
        ))),
    }
}

/// A fully validated, immutable pose job record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseJob {
    id: Option<i64>,
    kind: JobKind,
    model_version: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    output_blob_info_video: BlobInfo,
    output_blob_info_pose_data: BlobInfo,
    #[serde(rename = "userIP")]
    user_ip: Option<String>,
    user_hostname: Option<String>,
}

impl PoseJob {
    /// Build a record from typed input.
    ///
    /// `now` is the single clock reading used for both `createdAt` and
    /// `updatedAt` when the input omits them.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::MissingIdentifier`] naming the first derivable
    /// field that is absent while `id` is also absent.
    pub fn build(
        input: PoseJobInput,
        defaults: &JobDefaults,
        now: Timestamp,
    ) -> Result<Self, JobError> {
        let PoseJobInput {
            id,
            kind,
            model_version,
            created_at,
            updated_at,
            output_blob_info_video,
            output_blob_info_pose_data,
            user_ip,
            user_hostname,
        } = input;

        let output_blob_info_video = resolve_blob(
            DerivedField::OutputBlobInfoVideo,
            output_blob_info_video,
            id,
            &defaults.bucket,
        )?;
        let output_blob_info_pose_data = resolve_blob(
            DerivedField::OutputBlobInfoPoseData,
            output_blob_info_pose_data,
            id,
            &defaults.bucket,
        )?;

        Ok(Self {
            id,
            kind: kind.unwrap_or_default(),
            model_version: model_version.unwrap_or_else(|| defaults.model_version.clone()),
            created_at: created_at.unwrap_or(now),
            updated_at: updated_at.unwrap_or(now),
            output_blob_info_video,
            output_blob_info_pose_data,
            user_ip,
            user_hostname,
        })
    }

    /// Build a record from a JSON value using default configuration and the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::SchemaViolation`] if the value is not an object
    /// matching the input schema, or [`JobError::MissingIdentifier`] if a
    /// derivable field cannot be resolved.
    pub fn from_value(value: Value) -> Result<Self, JobError> {
        Self::from_value_with(value, &JobDefaults::default(), Timestamp::now())
    }

    /// Build a record from a JSON value with explicit defaults and clock.
    pub fn from_value_with(
        value: Value,
        defaults: &JobDefaults,
        now: Timestamp,
    ) -> Result<Self, JobError> {
        if !value.is_object() {
            tracing::warn!("rejecting pose job input: not an object");
            return Err(JobError::schema(format!(
                "expected an object of fields, got {}",
                json_type_name(&value)
            )));
        }
        let input = parse_input(value).map_err(|e| {
            tracing::warn!(field = e.field(), error = %e, "rejecting pose job input");
            e
        })?;
        Self::build(input, defaults, now)
    }

    /// Build a record from a field mapping using default configuration and
    /// the current time.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, JobError> {
        Self::from_value(Value::Object(map))
    }

    /// Start a typed builder.
    pub fn builder() -> PoseJobBuilder {
        PoseJobBuilder::default()
    }

    /// Return a new record identical to this one except for `updatedAt`.
    ///
    /// Records are never modified in place.
    pub fn touched(&self, now: Timestamp) -> Self {
        Self {
            updated_at: now,
            ..self.clone()
        }
    }

    /// The mapping view of this record, keyed by wire field name.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), json!(self.id));
        map.insert("kind".into(), Value::String(self.kind.as_str().to_string()));
        map.insert("modelVersion".into(), Value::String(self.model_version.clone()));
        map.insert("createdAt".into(), Value::String(self.created_at.to_iso8601()));
        map.insert("updatedAt".into(), Value::String(self.updated_at.to_iso8601()));
        map.insert(
            DerivedField::OutputBlobInfoVideo.wire_name().into(),
            blob_value(&self.output_blob_info_video),
        );
        map.insert(
            DerivedField::OutputBlobInfoPoseData.wire_name().into(),
            blob_value(&self.output_blob_info_pose_data),
        );
        map.insert("userIP".into(), json!(self.user_ip));
        map.insert("userHostname".into(), json!(self.user_hostname));
        map
    }

    /// Job identifier, if one was supplied.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Kind tag.
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Model version.
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Creation time.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update time.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Video output location.
    pub fn output_blob_info_video(&self) -> &BlobInfo {
        &self.output_blob_info_video
    }

    /// Pose data output location.
    pub fn output_blob_info_pose_data(&self) -> &BlobInfo {
        &self.output_blob_info_pose_data
    }

    /// Address of the requesting client.
    pub fn user_ip(&self) -> Option<&str> {
        self.user_ip.as_deref()
    }

    /// Hostname of the requesting client.
    pub fn user_hostname(&self) -> Option<&str> {
        self.user_hostname.as_deref()
    }
}

fn resolve_blob(
    field: DerivedField,
    supplied: Option<BlobInfoInput>,
    id: Option<i64>,
    default_bucket: &str,
) -> Result<BlobInfo, JobError> {
    if let Some(blob) = supplied {
        return Ok(blob.resolve(default_bucket));
    }
    match id {
        Some(id) => {
            let blob = field.derive(id, default_bucket);
            tracing::debug!(field = %field, id, blob = %blob, "derived blob location from id");
            Ok(blob)
        }
        None => {
            tracing::warn!(field = %field, "rejecting pose job: id missing for derivable field");
            Err(JobError::MissingIdentifier { field })
        }
    }
}

/// Parse an object into [`PoseJobInput`], naming the offending field on failure.
fn parse_input(value: Value) -> Result<PoseJobInput, JobError> {
    if let Some(unknown) = value
        .as_object()
        .and_then(|fields| fields.keys().find(|k| !PoseJobInput::FIELDS.contains(&k.as_str())))
    {
        return Err(JobError::schema_at(
            unknown.clone(),
            format!(
                "unknown field `{unknown}`, expected one of {}",
                PoseJobInput::FIELDS.join(", ")
            ),
        ));
    }

    serde_path_to_error::deserialize(value).map_err(|e| {
        let path = e.path().to_string();
        let reason = e.into_inner().to_string();
        if path == "." {
            JobError::schema(reason)
        } else {
            JobError::schema_at(path, reason)
        }
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn blob_value(blob: &BlobInfo) -> Value {
    json!({ "name": blob.name, "bucket": blob.bucket })
}

/// Fluent builder over [`PoseJobInput`].
#[derive(Debug, Clone, Default)]
pub struct PoseJobBuilder {
    input: PoseJobInput,
}

impl PoseJobBuilder {
    /// Set the job identifier.
    pub fn id(mut self, id: i64) -> Self {
        self.input.id = Some(id);
        self
    }

    /// Set the kind tag.
    pub fn kind(mut self, kind: JobKind) -> Self {
        self.input.kind = Some(kind);
        self
    }

    /// Set the model version.
    pub fn model_version(mut self, version: impl Into<String>) -> Self {
        self.input.model_version = Some(version.into());
        self
    }

    /// Set the creation time.
    pub fn created_at(mut self, at: Timestamp) -> Self {
        self.input.created_at = Some(at);
        self
    }

    /// Set the last update time.
    pub fn updated_at(mut self, at: Timestamp) -> Self {
        self.input.updated_at = Some(at);
        self
    }

    /// Set the video output location.
    pub fn output_blob_info_video(mut self, blob: impl Into<BlobInfoInput>) -> Self {
        self.input.output_blob_info_video = Some(blob.into());
        self
    }

    /// Set the pose data output location.
    pub fn output_blob_info_pose_data(mut self, blob: impl Into<BlobInfoInput>) -> Self {
        self.input.output_blob_info_pose_data = Some(blob.into());
        self
    }

    /// Set the client address.
    pub fn user_ip(mut self, ip: impl Into<String>) -> Self {
        self.input.user_ip = Some(ip.into());
        self
    }

    /// Set the client hostname.
    pub fn user_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.input.user_hostname = Some(hostname.into());
        self
    }

    /// Build with default configuration and the current time.
    pub fn build(self) -> Result<PoseJob, JobError> {
        self.build_with(&JobDefaults::default(), Timestamp::now())
    }

    /// Build with explicit defaults and clock.
    pub fn build_with(self, defaults: &JobDefaults, now: Timestamp) -> Result<PoseJob, JobError> {
        PoseJob::build(self.input, defaults, now)
    }
}
