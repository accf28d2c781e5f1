use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::answer::AnswerRecord;

/// Draft of a new, incomplete submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    #[validate(length(min = 1))]
    pub candidate_id: String,
    #[validate(length(min = 1))]
    pub test_id: String,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "Max score must be positive"))]
    pub max_score: u32,
}

/// Partial update of a submission. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<AnswerRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    #[serde(default, alias = "timeSpent", skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<u32>,
}

impl SubmissionPatch {
    /// Autosave payload: replaces the answers and nothing else.
    pub fn answers_only(answers: Vec<AnswerRecord>) -> Self {
        Self {
            answers: Some(answers),
            ..Default::default()
        }
    }

    pub fn finalize(
        answers: Vec<AnswerRecord>,
        total_score: u32,
        time_spent_seconds: u32,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            answers: Some(answers),
            is_completed: Some(true),
            end_time: Some(end_time),
            total_score: Some(total_score),
            time_spent_seconds: Some(time_spent_seconds),
        }
    }

    pub fn completes(&self) -> bool {
        self.is_completed == Some(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequest {
    #[validate(length(min = 1))]
    pub candidate_id: String,
    #[validate(length(min = 1))]
    pub test_id: String,
    #[validate(length(min = 1))]
    pub keep_submission_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub message: String,
    pub removed: usize,
}
