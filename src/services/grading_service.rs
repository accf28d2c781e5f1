use crate::models::answer::AnswerMap;
use crate::models::question::{AnswerValue, Question, QuestionType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub earned_points: u32,
    /// Points of auto-scorable questions only.
    pub total_points: u32,
    pub correct_count: u32,
    pub graded: Vec<GradedAnswer>,
}

impl ScoreSummary {
    /// Rounded percentage; 0 when nothing in the test is auto-scorable.
    pub fn percentage(&self) -> u32 {
        if self.total_points == 0 {
            return 0;
        }
        ((self.earned_points as f64 / self.total_points as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub question_id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// `None` for questions that need manual review.
    pub is_correct: Option<bool>,
    pub points_earned: u32,
    pub max_points: u32,
}

pub struct GradingService;

impl GradingService {
    /// Scores captured answers against expected answers. Pure; never fails.
    /// Malformed or missing answers count as incorrect.
    pub fn score(questions: &[Question], answers: &AnswerMap) -> ScoreSummary {
        let mut summary = ScoreSummary::default();

        for q in questions {
            if !q.is_auto_scorable() {
                summary.graded.push(GradedAnswer {
                    question_id: q.id.clone(),
                    question_type: q.question_type,
                    is_correct: None,
                    points_earned: 0,
                    max_points: q.points,
                });
                continue;
            }

            summary.total_points += q.points;
            let is_correct = match (answers.get(&q.id), q.expected_answer.as_ref()) {
                (Some(given), Some(expected)) => Self::is_correct(q.question_type, given, expected),
                _ => false,
            };

            let points_earned = if is_correct { q.points } else { 0 };
            if is_correct {
                summary.correct_count += 1;
                summary.earned_points += points_earned;
            }
            summary.graded.push(GradedAnswer {
                question_id: q.id.clone(),
                question_type: q.question_type,
                is_correct: Some(is_correct),
                points_earned,
                max_points: q.points,
            });
        }

        summary
    }

    pub fn is_correct(question_type: QuestionType, given: &AnswerValue, expected: &AnswerValue) -> bool {
        match question_type {
            QuestionType::SingleChoice => match (given, expected) {
                (AnswerValue::Text(g), AnswerValue::Text(e)) => g == e,
                _ => false,
            },
            QuestionType::FillBlank => match (given, expected) {
                (AnswerValue::Text(g), AnswerValue::Text(e)) => {
                    g.trim().to_lowercase() == e.trim().to_lowercase()
                }
                _ => false,
            },
            // Lenient heuristic: the normalized expected snippet must appear in the
            // normalized submission. No code is executed.
            QuestionType::Code => match (given, expected) {
                (AnswerValue::Text(g), AnswerValue::Text(e)) => {
                    let needle = normalize_code(e);
                    !needle.is_empty() && normalize_code(g).contains(&needle)
                }
                _ => false,
            },
            QuestionType::OrderedList => match (given, expected) {
                (AnswerValue::List(g), AnswerValue::List(e)) => g == e,
                _ => false,
            },
            QuestionType::ShortText => false,
        }
    }
}

/// Lowercase with every non-alphanumeric character removed.
fn normalize_code(src: &str) -> String {
    src.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
