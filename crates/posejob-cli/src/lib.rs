//! # posejob-cli — Command-Line Collaborator for Pose Job Records
//!
//! Provides the `posejob` binary. The CLI only gathers input and reports
//! outcomes; validation and derivation live in `posejob-core` and
//! `posejob-schema`.
//!
//! ## Subcommands
//!
//! - `posejob build` — Build a record from a JSON/YAML document or stdin.
//! - `posejob auth` — Check an `Authorization` header value.
//!
//! ```bash
//! posejob build job.json --pretty
//! echo '{"id": 42}' | posejob build
//! POSEJOB_AUTH_SECRET=s3cr3t posejob auth "Bearer s3cr3t"
//! ```
//!
//! Exit codes: 0 on success, 1 when the input or credential is rejected,
//! 2 on operational errors (unreadable file, bad configuration).

pub mod auth;
pub mod job;
