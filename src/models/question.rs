use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator between ordered-list items inside a question prompt.
pub const ORDERED_ITEM_SEPARATOR: char = '|';

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "content")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, alias = "correctAnswer", skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<AnswerValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub points: u32,
    #[serde(default, alias = "timeLimit", skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Items a candidate arranges for an ordered-list question, in authored order.
    pub fn ordered_items(&self) -> Vec<String> {
        if !self.prompt.contains(ORDERED_ITEM_SEPARATOR) {
            return Vec::new();
        }
        self.prompt
            .split(ORDERED_ITEM_SEPARATOR)
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }

    pub fn is_auto_scorable(&self) -> bool {
        self.question_type.is_auto_scorable()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[serde(alias = "mcq")]
    SingleChoice,
    #[serde(alias = "fill-in-blank")]
    FillBlank,
    #[serde(alias = "coding")]
    Code,
    #[serde(alias = "drag-drop")]
    OrderedList,
    ShortText,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::SingleChoice,
        QuestionType::FillBlank,
        QuestionType::Code,
        QuestionType::OrderedList,
        QuestionType::ShortText,
    ];

    /// Short-text answers need a human reader; everything else is compared as strings.
    pub fn is_auto_scorable(self) -> bool {
        !matches!(self, QuestionType::ShortText)
    }

    /// Whether answers of this type are a sequence rather than a single string.
    pub fn expects_list(self) -> bool {
        matches!(self, QuestionType::OrderedList)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single-choice",
            QuestionType::FillBlank => "fill-blank",
            QuestionType::Code => "code",
            QuestionType::OrderedList => "ordered-list",
            QuestionType::ShortText => "short-text",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured or expected answer: one string, or an ordered sequence for ordered-list questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            AnswerValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnswerValue::List(items) => Some(items),
            AnswerValue::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.is_empty(),
            AnswerValue::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::List(value)
    }
}
