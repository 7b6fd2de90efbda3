//! # Enumerated Tags
//!
//! [`JobKind`] is the categorical tag stored on every record. It has a single
//! member today and is fixed by default at construction; a supplied value
//! must still be a member.
//!
//! [`AssessmentType`] names the analysis a pose job feeds into. Enum members
//! are the constants code should compare against; the string value exists
//! for storage and transport.

use serde::{Deserialize, Serialize};

use crate::error::JobError;

/// The kind tag of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// A pose-estimation job.
    #[default]
    PoseJob,
}

impl JobKind {
    /// Return all kinds as a slice.
    pub fn all() -> &'static [JobKind] {
        &[Self::PoseJob]
    }

    /// The wire value of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PoseJob => "pose_job",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobKind {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| JobError::schema_at("kind", format!("unknown job kind: {s:?}")))
    }
}

/// The assessment a pose job's output is used for.
///
/// This is not a [`PoseJob`](crate::PoseJob) field and the record
/// constructor rejects an `assessment` key. It exists for callers that tag
/// or route jobs by assessment outside the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentType {
    /// Gait analysis.
    Gait,
}

impl AssessmentType {
    /// Return all assessment types as a slice.
    pub fn all() -> &'static [AssessmentType] {
        &[Self::Gait]
    }

    /// The wire value of this assessment type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gait => "GAIT",
        }
    }
}

impl std::fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssessmentType {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| JobError::schema(format!("unknown assessment type: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_kind_defaults_to_pose_job() {
        assert_eq!(JobKind::default(), JobKind::PoseJob);
    }

    #[test]
    fn job_kind_serde_matches_as_str() {
        for kind in JobKind::all() {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::json!(kind.as_str()));
        }
    }

    #[test]
    fn job_kind_rejects_unknown_value() {
        assert!("pose_job".parse::<JobKind>().is_ok());
        assert!("video_job".parse::<JobKind>().is_err());
        assert!(serde_json::from_str::<JobKind>("\"video_job\"").is_err());
    }

    #[test]
    fn assessment_type_parses_incoming_value() {
        let parsed: AssessmentType = serde_json::from_str("\"GAIT\"").unwrap();
        assert_eq!(parsed, AssessmentType::Gait);
        assert_eq!(parsed.as_str(), "GAIT");
        assert_eq!("GAIT".parse::<AssessmentType>().unwrap(), AssessmentType::Gait);
    }

    #[test]
    fn assessment_type_is_case_sensitive() {
        assert!("gait".parse::<AssessmentType>().is_err());
    }
}
