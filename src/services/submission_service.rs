use crate::dto::submission_dto::{NewSubmission, SubmissionPatch};
use crate::error::{Error, Result};
use crate::models::submission::{Submission, SubmissionFilter};
use crate::storage::json_store::JsonStore;
use crate::utils::{id::generate_id, time::now};

#[derive(Clone)]
pub struct SubmissionService {
    store: JsonStore<Submission>,
}

impl SubmissionService {
    pub fn new(store: JsonStore<Submission>) -> Self {
        Self { store }
    }

    pub async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        Ok(self
            .store
            .read_all()
            .await?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect())
    }

    pub async fn get_submission(&self, id: &str) -> Result<Submission> {
        self.store
            .read_all()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("Submission {} not found", id)))
    }

    /// New submissions always start incomplete, whatever the draft says.
    pub async fn create_submission(&self, draft: NewSubmission) -> Result<Submission> {
        let submission = Submission {
            id: generate_id(),
            candidate_id: draft.candidate_id,
            test_id: draft.test_id,
            answers: draft.answers,
            start_time: draft.start_time.unwrap_or_else(now),
            end_time: None,
            total_score: None,
            max_score: draft.max_score,
            is_completed: false,
            time_spent_seconds: None,
        };

        let created = submission.clone();
        self.store
            .update(move |submissions| {
                submissions.push(submission);
                Ok(())
            })
            .await?;
        tracing::info!(
            submission_id = %created.id,
            candidate_id = %created.candidate_id,
            test_id = %created.test_id,
            "Submission created"
        );
        Ok(created)
    }

    pub async fn patch_submission(&self, id: &str, patch: SubmissionPatch) -> Result<Submission> {
        if patch.end_time.is_some() && !patch.completes() {
            return Err(Error::BadRequest(
                "endTime can only be set together with isCompleted=true".to_string(),
            ));
        }

        let updated = self
            .store
            .update(|submissions| {
                let s = submissions
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| Error::NotFound(format!("Submission {} not found", id)))?;

                if s.is_completed {
                    return Err(Error::Conflict(format!(
                        "Submission {} is already completed",
                        id
                    )));
                }

                let completes = patch.completes();
                if let Some(answers) = patch.answers {
                    s.answers = answers;
                }
                if let Some(score) = patch.total_score {
                    s.total_score = Some(score);
                }
                if let Some(spent) = patch.time_spent_seconds {
                    s.time_spent_seconds = Some(spent);
                }
                if completes {
                    s.is_completed = true;
                    s.end_time = Some(patch.end_time.unwrap_or_else(now));
                }
                Ok(s.clone())
            })
            .await?;

        if updated.is_completed {
            tracing::info!(
                submission_id = %updated.id,
                total_score = ?updated.total_score,
                max_score = updated.max_score,
                "Submission completed"
            );
        } else {
            tracing::debug!(submission_id = %updated.id, answers = updated.answers.len(), "Submission saved");
        }
        Ok(updated)
    }

    /// Deletes every incomplete submission of the pair except `keep_id`. Completed
    /// submissions are never touched.
    pub async fn cleanup_incomplete_submissions(
        &self,
        candidate_id: &str,
        test_id: &str,
        keep_id: &str,
    ) -> Result<usize> {
        let removed = self
            .store
            .update(|submissions| {
                let before = submissions.len();
                submissions.retain(|s| !(s.is_incomplete_for(candidate_id, test_id) && s.id != keep_id));
                Ok(before - submissions.len())
            })
            .await?;
        if removed > 0 {
            tracing::info!(candidate_id, test_id, keep_id, removed, "Removed stale incomplete submissions");
        }
        Ok(removed)
    }
}
