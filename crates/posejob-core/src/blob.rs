//! # Blob Locations
//!
//! A [`BlobInfo`] names an object in a storage bucket. Input may omit the
//! bucket ([`BlobInfoInput`]); it is filled from the configured default when
//! the record is built.

use serde::{Deserialize, Serialize};

/// A resolved object location: `name` inside `bucket`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobInfo {
    /// Object name within the bucket (e.g. `42/video.mp4`).
    pub name: String,
    /// Bucket holding the object.
    pub bucket: String,
}

impl BlobInfo {
    /// Create a blob location.
    pub fn new(name: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bucket: bucket.into(),
        }
    }
}

impl std::fmt::Display for BlobInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.name)
    }
}

/// A blob location as supplied by a caller, with an optional bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlobInfoInput {
    /// Object name within the bucket.
    pub name: String,
    /// Bucket; the default bucket is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

impl BlobInfoInput {
    /// A location with a name only; the bucket is defaulted on build.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bucket: None,
        }
    }

    /// Resolve into a [`BlobInfo`], falling back to `default_bucket`.
    pub fn resolve(self, default_bucket: &str) -> BlobInfo {
        BlobInfo {
            name: self.name,
            bucket: self.bucket.unwrap_or_else(|| default_bucket.to_string()),
        }
    }
}

impl From<BlobInfo> for BlobInfoInput {
    fn from(blob: BlobInfo) -> Self {
        Self {
            name: blob.name,
            bucket: Some(blob.bucket),
        }
    }
}
