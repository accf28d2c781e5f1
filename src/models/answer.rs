use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::question::AnswerValue;

/// In-memory answers of a session, keyed by question id. A missing key means unanswered.
pub type AnswerMap = BTreeMap<String, AnswerValue>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub answer: AnswerValue,
    /// Best effort only.
    #[serde(default, alias = "timeSpent")]
    pub time_spent_seconds: u32,
}

impl AnswerRecord {
    pub fn new(question_id: impl Into<String>, answer: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            answer,
            time_spent_seconds: 0,
        }
    }

    /// Flattens an answer map into the stored record list. The stored list always
    /// replaces the previous one in full.
    pub fn from_map(answers: &AnswerMap) -> Vec<AnswerRecord> {
        answers
            .iter()
            .map(|(question_id, answer)| AnswerRecord::new(question_id.clone(), answer.clone()))
            .collect()
    }

    pub fn into_map(records: &[AnswerRecord]) -> AnswerMap {
        records
            .iter()
            .map(|r| (r.question_id.clone(), r.answer.clone()))
            .collect()
    }
}
