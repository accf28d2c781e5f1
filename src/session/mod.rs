//! Test-taking session: state machine, countdown, submission lifecycle and
//! the event loop that ties them together.

pub mod engine;
pub mod lifecycle;
pub mod runner;
pub mod timer;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use engine::{SessionPhase, SessionSnapshot, TestSession};
pub use lifecycle::SubmissionLifecycle;
pub use runner::{SessionHandle, SessionRunner};

/// Who is taking which test. Passed explicitly into every session operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub candidate_id: String,
    pub test_id: String,
}

impl SessionContext {
    pub fn new(candidate_id: impl Into<String>, test_id: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            test_id: test_id.into(),
        }
    }
}

/// How the countdown is seeded when an incomplete submission is resumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResumePolicy {
    /// Every entry starts from the full time limit.
    #[default]
    FullReset,
    /// Time elapsed since the submission's start time is deducted.
    SeedFromStartTime,
}

impl FromStr for ResumePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" | "full-reset" => Ok(ResumePolicy::FullReset),
            "elapsed" => Ok(ResumePolicy::SeedFromStartTime),
            other => Err(format!("unknown resume policy '{}', expected 'reset' or 'elapsed'", other)),
        }
    }
}

impl fmt::Display for ResumePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumePolicy::FullReset => f.write_str("reset"),
            ResumePolicy::SeedFromStartTime => f.write_str("elapsed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub resume_policy: ResumePolicy,
    /// Remaining-seconds marks that raise a one-time warning.
    pub warning_thresholds: Vec<u32>,
    pub tick_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            resume_policy: ResumePolicy::default(),
            warning_thresholds: vec![300, 60],
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl SessionSettings {
    pub fn with_resume_policy(resume_policy: ResumePolicy) -> Self {
        Self {
            resume_policy,
            ..Default::default()
        }
    }
}
