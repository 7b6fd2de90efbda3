#![deny(missing_docs)]

//! # posejob-core — Self-Validating Pose Job Records
//!
//! This crate defines the [`PoseJob`] record and the single constructor path
//! that produces it. A `PoseJob` either comes out fully populated or does not
//! come out at all.
//!
//! ## Design Principles
//!
//! 1. **One builder, no round-trip.** Input is parsed into a strict
//!    [`PoseJobInput`] (unknown fields rejected), defaults are applied, the
//!    derivable blob locations are resolved in declaration order, and the
//!    immutable record is returned. There is no construct-mutate-reconstruct
//!    cycle.
//!
//! 2. **Derivation is checked per field.** Supplying `outputBlobInfoVideo`
//!    does not excuse a missing `id` when `outputBlobInfoPoseData` is also
//!    absent. Each [`DerivedField`] is resolved independently.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] is truncated to seconds and
//!    always renders with a `Z` suffix. The clock is read once per build.
//!
//! 4. **[`JobError`] hierarchy.** Structured errors with `thiserror`, no
//!    `.unwrap()` outside tests.

pub mod auth;
pub mod blob;
pub mod config;
pub mod error;
pub mod job;
pub mod kind;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use auth::{AuthConfig, AuthorizationHeader};
pub use blob::{BlobInfo, BlobInfoInput};
pub use config::{JobDefaults, DEFAULT_BUCKET, DEFAULT_MODEL_VERSION};
pub use error::{AuthorizationError, ConfigError, JobError};
pub use job::{DerivedField, PoseJob, PoseJobBuilder, PoseJobInput};
pub use kind::{AssessmentType, JobKind};
pub use temporal::Timestamp;
