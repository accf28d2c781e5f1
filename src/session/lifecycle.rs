use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::SessionContext;
use crate::backend::SessionBackend;
use crate::dto::submission_dto::{NewSubmission, SubmissionPatch};
use crate::error::{Error, Result};
use crate::models::{
    answer::{AnswerMap, AnswerRecord},
    question::Question,
    submission::{Submission, SubmissionFilter},
    test::Test,
};
use crate::utils::time::now;

/// Translates session events into persistence calls.
///
/// Clones share one start lock, so concurrent `start_or_resume` calls made
/// through the same client resolve to a single submission.
#[derive(Clone)]
pub struct SubmissionLifecycle {
    backend: Arc<dyn SessionBackend>,
    start_lock: Arc<Mutex<()>>,
}

impl SubmissionLifecycle {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self {
            backend,
            start_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn backend(&self) -> &Arc<dyn SessionBackend> {
        &self.backend
    }

    /// Fetches the test and its questions in presentation order. Ids that no
    /// longer resolve are skipped; a test left with none cannot be taken.
    pub async fn load(&self, ctx: &SessionContext) -> Result<(Test, Vec<Question>)> {
        let test = self.backend.fetch_test(&ctx.test_id).await?;
        let mut bank: HashMap<String, Question> = self
            .backend
            .fetch_questions()
            .await?
            .into_iter()
            .filter(|q| test.question_ids.contains(&q.id))
            .map(|q| (q.id.clone(), q))
            .collect();

        let questions: Vec<Question> = test
            .question_ids
            .iter()
            .filter_map(|id| bank.remove(id))
            .collect();

        if questions.is_empty() {
            return Err(Error::TestConfiguration(format!(
                "Test {} references no available questions",
                test.id
            )));
        }
        if questions.len() < test.question_ids.len() {
            tracing::warn!(
                test_id = %test.id,
                referenced = test.question_ids.len(),
                resolved = questions.len(),
                "Test references missing questions"
            );
        }
        Ok((test, questions))
    }

    /// Reuses the pair's incomplete submission or creates one, then removes
    /// any other incomplete sibling. Cleanup failure leaves the new
    /// submission in place and is only logged.
    pub async fn start_or_resume(&self, ctx: &SessionContext, max_score: u32) -> Result<Submission> {
        let _guard = self.start_lock.lock().await;

        let filter = SubmissionFilter::for_pair(&ctx.candidate_id, &ctx.test_id);
        let existing = self
            .backend
            .list_submissions(&filter)
            .await?
            .into_iter()
            .filter(|s| !s.is_completed)
            .max_by_key(|s| s.start_time);

        if let Some(submission) = existing {
            tracing::info!(
                submission_id = %submission.id,
                candidate_id = %ctx.candidate_id,
                test_id = %ctx.test_id,
                "Resuming incomplete submission"
            );
            return Ok(submission);
        }

        let submission = self
            .backend
            .create_submission(NewSubmission {
                candidate_id: ctx.candidate_id.clone(),
                test_id: ctx.test_id.clone(),
                answers: Vec::new(),
                start_time: Some(now()),
                max_score,
            })
            .await?;

        if let Err(e) = self
            .backend
            .cleanup_incomplete_submissions(&ctx.candidate_id, &ctx.test_id, &submission.id)
            .await
        {
            tracing::warn!(
                submission_id = %submission.id,
                error = %e,
                "Failed to clean up sibling submissions"
            );
        }
        Ok(submission)
    }

    /// Replaces the stored answers and nothing else.
    pub async fn autosave(&self, submission_id: &str, answers: &AnswerMap) -> Result<Submission> {
        self.backend
            .patch_submission(
                submission_id,
                SubmissionPatch::answers_only(AnswerRecord::from_map(answers)),
            )
            .await
    }

    /// Sends a completing patch as one update.
    pub async fn submit_patch(&self, submission_id: &str, patch: SubmissionPatch) -> Result<Submission> {
        if !patch.completes() {
            return Err(Error::BadRequest(
                "A finalizing update must mark the submission completed".to_string(),
            ));
        }
        self.backend.patch_submission(submission_id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockSessionBackend;
    use crate::models::question::QuestionType;
    use chrono::Utc;
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    fn ctx() -> SessionContext {
        SessionContext::new("c1", "t1")
    }

    fn submission(id: &str, completed: bool) -> Submission {
        Submission {
            id: id.into(),
            candidate_id: "c1".into(),
            test_id: "t1".into(),
            answers: vec![],
            start_time: Utc::now(),
            end_time: completed.then(Utc::now),
            total_score: None,
            max_score: 15,
            is_completed: completed,
            time_spent_seconds: None,
        }
    }

    fn test_with(ids: &[&str]) -> Test {
        Test {
            id: "t1".into(),
            title: "Basics".into(),
            description: String::new(),
            question_ids: ids.iter().map(|s| s.to_string()).collect(),
            time_limit_minutes: 1,
            total_points: 15,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn question(id: &str) -> Question {
        Question {
            id: id.into(),
            question_type: QuestionType::ShortText,
            title: String::new(),
            prompt: "Explain".into(),
            options: None,
            expected_answer: None,
            code_template: None,
            language: None,
            points: 5,
            time_limit_seconds: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn resumes_existing_incomplete_submission() {
        let mut backend = MockSessionBackend::new();
        backend
            .expect_list_submissions()
            .returning(|_| Ok(vec![submission("done", true), submission("open", false)]));
        backend.expect_create_submission().never();
        backend.expect_cleanup_incomplete_submissions().never();

        let lifecycle = SubmissionLifecycle::new(Arc::new(backend));
        let resumed = assert_ok!(lifecycle.start_or_resume(&ctx(), 15).await);
        assert_eq!(resumed.id, "open");
    }

    #[tokio::test]
    async fn creates_then_cleans_up_siblings() {
        let mut backend = MockSessionBackend::new();
        backend.expect_list_submissions().returning(|_| Ok(vec![]));
        backend
            .expect_create_submission()
            .times(1)
            .withf(|draft| draft.answers.is_empty() && draft.max_score == 15)
            .returning(|_| Ok(submission("fresh", false)));
        backend
            .expect_cleanup_incomplete_submissions()
            .with(eq("c1"), eq("t1"), eq("fresh"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let lifecycle = SubmissionLifecycle::new(Arc::new(backend));
        let created = assert_ok!(lifecycle.start_or_resume(&ctx(), 15).await);
        assert_eq!(created.id, "fresh");
    }

    #[tokio::test]
    async fn cleanup_failure_keeps_new_submission() {
        let mut backend = MockSessionBackend::new();
        backend.expect_list_submissions().returning(|_| Ok(vec![]));
        backend
            .expect_create_submission()
            .returning(|_| Ok(submission("fresh", false)));
        backend
            .expect_cleanup_incomplete_submissions()
            .returning(|_, _, _| Err(Error::Transient("offline".into())));

        let lifecycle = SubmissionLifecycle::new(Arc::new(backend));
        let created = assert_ok!(lifecycle.start_or_resume(&ctx(), 15).await);
        assert_eq!(created.id, "fresh");
    }

    #[tokio::test]
    async fn load_orders_questions_by_test() {
        let mut backend = MockSessionBackend::new();
        backend
            .expect_fetch_test()
            .returning(|_| Ok(test_with(&["q2", "gone", "q1"])));
        backend
            .expect_fetch_questions()
            .returning(|| Ok(vec![question("q1"), question("q2"), question("q3")]));

        let lifecycle = SubmissionLifecycle::new(Arc::new(backend));
        let (_, questions) = assert_ok!(lifecycle.load(&ctx()).await);
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q2", "q1"]);
    }

    #[tokio::test]
    async fn load_distinguishes_missing_test_from_empty_test() {
        let mut missing = MockSessionBackend::new();
        missing
            .expect_fetch_test()
            .returning(|id| Err(Error::NotFound(format!("Test {} not found", id))));
        let err = assert_err!(SubmissionLifecycle::new(Arc::new(missing)).load(&ctx()).await);
        assert!(matches!(err, Error::NotFound(_)));

        let mut empty = MockSessionBackend::new();
        empty.expect_fetch_test().returning(|_| Ok(test_with(&["gone"])));
        empty.expect_fetch_questions().returning(|| Ok(vec![question("q1")]));
        let err = assert_err!(SubmissionLifecycle::new(Arc::new(empty)).load(&ctx()).await);
        assert!(matches!(err, Error::TestConfiguration(_)));
    }

    #[tokio::test]
    async fn autosave_sends_answers_only() {
        let mut backend = MockSessionBackend::new();
        backend
            .expect_patch_submission()
            .withf(|id, patch| {
                id == "s1"
                    && patch.is_completed.is_none()
                    && patch.end_time.is_none()
                    && patch.answers.as_ref().map(Vec::len) == Some(1)
            })
            .returning(|_, _| Ok(submission("s1", false)));

        let lifecycle = SubmissionLifecycle::new(Arc::new(backend));
        let mut answers = AnswerMap::new();
        answers.insert("q1".into(), "B".into());
        assert_ok!(lifecycle.autosave("s1", &answers).await);
    }

    #[tokio::test]
    async fn submit_patch_completes_in_one_update() {
        let mut backend = MockSessionBackend::new();
        backend
            .expect_patch_submission()
            .times(1)
            .withf(|_, patch| {
                patch.completes()
                    && patch.total_score == Some(10)
                    && patch.time_spent_seconds == Some(60)
                    && patch.end_time.is_some()
            })
            .returning(|_, _| Ok(submission("s1", true)));

        let lifecycle = SubmissionLifecycle::new(Arc::new(backend));
        let patch = SubmissionPatch::finalize(vec![], 10, 60, Utc::now());
        let done = assert_ok!(lifecycle.submit_patch("s1", patch).await);
        assert!(done.is_completed);
    }

    #[tokio::test]
    async fn submit_patch_refuses_non_completing_update() {
        let mut backend = MockSessionBackend::new();
        backend.expect_patch_submission().never();

        let lifecycle = SubmissionLifecycle::new(Arc::new(backend));
        let err = assert_err!(
            lifecycle
                .submit_patch("s1", SubmissionPatch::answers_only(vec![]))
                .await
        );
        assert!(matches!(err, Error::BadRequest(_)));
    }
}
