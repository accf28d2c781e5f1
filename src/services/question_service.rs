use crate::dto::assessment_dto::{CreateQuestionPayload, UpdateQuestionPayload};
use crate::error::{Error, Result};
use crate::models::question::{AnswerValue, Question, QuestionType};
use crate::storage::json_store::JsonStore;
use crate::utils::{id::generate_id, time::now};

#[derive(Clone)]
pub struct QuestionService {
    store: JsonStore<Question>,
}

impl QuestionService {
    pub fn new(store: JsonStore<Question>) -> Self {
        Self { store }
    }

    pub async fn list_questions(&self) -> Result<Vec<Question>> {
        self.store.read_all().await
    }

    pub async fn get_question(&self, id: &str) -> Result<Question> {
        self.store
            .read_all()
            .await?
            .into_iter()
            .find(|q| q.id == id)
            .ok_or_else(|| Error::NotFound(format!("Question {} not found", id)))
    }

    pub async fn create_question(&self, payload: CreateQuestionPayload) -> Result<Question> {
        validate_answer_shape(
            payload.question_type,
            payload.options.as_deref(),
            payload.expected_answer.as_ref(),
        )?;

        let ts = now();
        let question = Question {
            id: generate_id(),
            question_type: payload.question_type,
            title: payload.title,
            prompt: payload.prompt,
            options: payload.options,
            expected_answer: payload.expected_answer,
            code_template: payload.code_template,
            language: payload.language,
            points: payload.points,
            time_limit_seconds: payload.time_limit_seconds,
            created_at: ts,
            updated_at: ts,
        };

        let created = question.clone();
        self.store
            .update(move |questions| {
                questions.push(question);
                Ok(())
            })
            .await?;
        tracing::info!(question_id = %created.id, question_type = %created.question_type, "Question created");
        Ok(created)
    }

    pub async fn update_question(&self, id: &str, payload: UpdateQuestionPayload) -> Result<Question> {
        self.store
            .update(|questions| {
                let q = questions
                    .iter_mut()
                    .find(|q| q.id == id)
                    .ok_or_else(|| Error::NotFound(format!("Question {} not found", id)))?;

                let mut next = q.clone();
                if let Some(t) = payload.question_type {
                    next.question_type = t;
                }
                if let Some(title) = payload.title {
                    next.title = title;
                }
                if let Some(prompt) = payload.prompt {
                    next.prompt = prompt;
                }
                if payload.options.is_some() {
                    next.options = payload.options;
                }
                if payload.expected_answer.is_some() {
                    next.expected_answer = payload.expected_answer;
                }
                if payload.code_template.is_some() {
                    next.code_template = payload.code_template;
                }
                if payload.language.is_some() {
                    next.language = payload.language;
                }
                if let Some(points) = payload.points {
                    next.points = points;
                }
                if payload.time_limit_seconds.is_some() {
                    next.time_limit_seconds = payload.time_limit_seconds;
                }
                validate_answer_shape(
                    next.question_type,
                    next.options.as_deref(),
                    next.expected_answer.as_ref(),
                )?;
                next.updated_at = now();
                *q = next;
                Ok(q.clone())
            })
            .await
    }

    pub async fn delete_question(&self, id: &str) -> Result<()> {
        self.store
            .update(|questions| {
                let before = questions.len();
                questions.retain(|q| q.id != id);
                if questions.len() == before {
                    return Err(Error::NotFound(format!("Question {} not found", id)));
                }
                Ok(())
            })
            .await
    }
}

/// Checks that options and the expected answer fit the question type.
pub fn validate_answer_shape(
    question_type: QuestionType,
    options: Option<&[String]>,
    expected: Option<&AnswerValue>,
) -> Result<()> {
    if question_type == QuestionType::SingleChoice {
        let options = options.unwrap_or_default();
        if options.is_empty() {
            return Err(Error::BadRequest(
                "Single-choice questions need at least one option".to_string(),
            ));
        }
        if let Some(AnswerValue::Text(e)) = expected {
            if !options.contains(e) {
                return Err(Error::BadRequest(
                    "Expected answer must be one of the options".to_string(),
                ));
            }
        }
    }

    match (question_type.expects_list(), expected) {
        (_, None) => Ok(()),
        (true, Some(AnswerValue::List(_))) | (false, Some(AnswerValue::Text(_))) => Ok(()),
        (true, Some(AnswerValue::Text(_))) => Err(Error::BadRequest(format!(
            "Expected answer for {} must be a list",
            question_type
        ))),
        (false, Some(AnswerValue::List(_))) => Err(Error::BadRequest(format!(
            "Expected answer for {} must be a string",
            question_type
        ))),
    }
}
