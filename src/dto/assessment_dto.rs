use crate::models::question::{AnswerValue, QuestionType};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionPayload {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub title: String,
    #[validate(length(min = 1, message = "Question prompt cannot be empty"))]
    #[serde(alias = "content")]
    pub prompt: String,
    pub options: Option<Vec<String>>,
    #[serde(alias = "correctAnswer")]
    pub expected_answer: Option<AnswerValue>,
    pub code_template: Option<String>,
    pub language: Option<String>,
    #[validate(range(min = 1, message = "Points must be positive"))]
    pub points: u32,
    #[validate(range(min = 1, message = "Time limit must be at least 1 second"))]
    #[serde(alias = "timeLimit")]
    pub time_limit_seconds: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionPayload {
    #[serde(rename = "type")]
    pub question_type: Option<QuestionType>,
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Question prompt cannot be empty"))]
    #[serde(alias = "content")]
    pub prompt: Option<String>,
    pub options: Option<Vec<String>>,
    #[serde(alias = "correctAnswer")]
    pub expected_answer: Option<AnswerValue>,
    pub code_template: Option<String>,
    pub language: Option<String>,
    #[validate(range(min = 1, message = "Points must be positive"))]
    pub points: Option<u32>,
    #[validate(range(min = 1, message = "Time limit must be at least 1 second"))]
    #[serde(alias = "timeLimit")]
    pub time_limit_seconds: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestPayload {
    #[validate(length(min = 1, message = "Test title cannot be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "A test needs at least one question"))]
    #[serde(alias = "questions")]
    pub question_ids: Vec<String>,
    #[validate(range(min = 1, message = "Time limit must be at least 1 minute"))]
    #[serde(alias = "timeLimit")]
    pub time_limit_minutes: u32,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestPayload {
    #[validate(length(min = 1, message = "Test title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "A test needs at least one question"))]
    #[serde(alias = "questions")]
    pub question_ids: Option<Vec<String>>,
    #[validate(range(min = 1, message = "Time limit must be at least 1 minute"))]
    #[serde(alias = "timeLimit")]
    pub time_limit_minutes: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidatePayload {
    #[validate(length(min = 1, message = "Candidate name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub assigned_tests: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidatePayload {
    #[validate(length(min = 1, message = "Candidate name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub assigned_tests: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestListQuery {
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub email: Option<String>,
}
