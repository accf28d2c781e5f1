use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::answer::{AnswerMap, AnswerRecord};

/// One candidate's attempt at one test.
///
/// `end_time` is present exactly when `is_completed` is true, and a completed
/// submission is never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub candidate_id: String,
    pub test_id: String,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    pub max_score: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, alias = "timeSpent", skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<u32>,
}

impl Submission {
    pub fn answer_map(&self) -> AnswerMap {
        AnswerRecord::into_map(&self.answers)
    }

    pub fn belongs_to(&self, candidate_id: &str, test_id: &str) -> bool {
        self.candidate_id == candidate_id && self.test_id == test_id
    }

    pub fn is_incomplete_for(&self, candidate_id: &str, test_id: &str) -> bool {
        self.belongs_to(candidate_id, test_id) && !self.is_completed
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
}

impl SubmissionFilter {
    pub fn for_pair(candidate_id: impl Into<String>, test_id: impl Into<String>) -> Self {
        Self {
            candidate_id: Some(candidate_id.into()),
            test_id: Some(test_id.into()),
        }
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        self.candidate_id
            .as_deref()
            .map_or(true, |c| submission.candidate_id == c)
            && self
                .test_id
                .as_deref()
                .map_or(true, |t| submission.test_id == t)
    }
}
