use async_trait::async_trait;
use validator::Validate;

use super::SessionBackend;
use crate::dto::submission_dto::{NewSubmission, SubmissionPatch};
use crate::error::Result;
use crate::models::{
    question::Question,
    submission::{Submission, SubmissionFilter},
    test::Test,
};
use crate::services::{
    question_service::QuestionService, submission_service::SubmissionService,
    test_service::TestService,
};
use crate::storage::DataStore;

/// Runs sessions in-process against the JSON store.
#[derive(Clone)]
pub struct LocalBackend {
    questions: QuestionService,
    tests: TestService,
    submissions: SubmissionService,
}

impl LocalBackend {
    pub fn new(store: &DataStore) -> Self {
        Self {
            questions: QuestionService::new(store.questions.clone()),
            tests: TestService::new(store.tests.clone(), store.questions.clone()),
            submissions: SubmissionService::new(store.submissions.clone()),
        }
    }
}

#[async_trait]
impl SessionBackend for LocalBackend {
    async fn fetch_test(&self, test_id: &str) -> Result<Test> {
        self.tests.get_test_by_id(test_id).await
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>> {
        self.questions.list_questions().await
    }

    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        self.submissions.list_submissions(filter).await
    }

    async fn create_submission(&self, draft: NewSubmission) -> Result<Submission> {
        draft.validate()?;
        self.submissions.create_submission(draft).await
    }

    async fn patch_submission(&self, id: &str, patch: SubmissionPatch) -> Result<Submission> {
        self.submissions.patch_submission(id, patch).await
    }

    async fn cleanup_incomplete_submissions(
        &self,
        candidate_id: &str,
        test_id: &str,
        keep_id: &str,
    ) -> Result<()> {
        self.submissions
            .cleanup_incomplete_submissions(candidate_id, test_id, keep_id)
            .await
            .map(|_| ())
    }
}
