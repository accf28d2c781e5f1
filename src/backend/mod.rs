//! Persistence collaborator used by the session engine.

pub mod http;
pub mod local;

use async_trait::async_trait;

use crate::dto::submission_dto::{NewSubmission, SubmissionPatch};
use crate::error::Result;
use crate::models::{
    question::Question,
    submission::{Submission, SubmissionFilter},
    test::Test,
};

pub use http::HttpBackend;
pub use local::LocalBackend;

/// The complete set of persistence operations a test-taking session needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn fetch_test(&self, test_id: &str) -> Result<Test>;

    /// The whole question bank; callers pick what a test references.
    async fn fetch_questions(&self) -> Result<Vec<Question>>;

    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>>;

    async fn create_submission(&self, draft: NewSubmission) -> Result<Submission>;

    async fn patch_submission(&self, id: &str, patch: SubmissionPatch) -> Result<Submission>;

    async fn cleanup_incomplete_submissions(
        &self,
        candidate_id: &str,
        test_id: &str,
        keep_id: &str,
    ) -> Result<()>;
}
