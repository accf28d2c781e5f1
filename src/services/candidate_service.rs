use crate::dto::assessment_dto::{CreateCandidatePayload, UpdateCandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::storage::json_store::JsonStore;
use crate::utils::{id::generate_id, time::now};

#[derive(Clone)]
pub struct CandidateService {
    store: JsonStore<Candidate>,
}

impl CandidateService {
    pub fn new(store: JsonStore<Candidate>) -> Self {
        Self { store }
    }

    pub async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        self.store.read_all().await
    }

    pub async fn get_candidate(&self, id: &str) -> Result<Candidate> {
        self.store
            .read_all()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    pub async fn create_candidate(&self, payload: CreateCandidatePayload) -> Result<Candidate> {
        let candidate = Candidate {
            id: generate_id(),
            name: payload.name,
            email: payload.email,
            assigned_tests: payload.assigned_tests,
            created_at: now(),
        };

        let created = candidate.clone();
        self.store
            .update(move |candidates| {
                if candidates
                    .iter()
                    .any(|c| c.email.eq_ignore_ascii_case(&candidate.email))
                {
                    return Err(Error::Conflict(
                        "A candidate with this email address already exists.".to_string(),
                    ));
                }
                candidates.push(candidate);
                Ok(())
            })
            .await?;
        tracing::info!(candidate_id = %created.id, "Candidate created");
        Ok(created)
    }

    pub async fn update_candidate(&self, id: &str, payload: UpdateCandidatePayload) -> Result<Candidate> {
        self.store
            .update(|candidates| {
                let c = candidates
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))?;
                if let Some(name) = payload.name {
                    c.name = name;
                }
                if let Some(email) = payload.email {
                    c.email = email;
                }
                if let Some(tests) = payload.assigned_tests {
                    c.assigned_tests = tests;
                }
                Ok(c.clone())
            })
            .await
    }

    pub async fn delete_candidate(&self, id: &str) -> Result<()> {
        self.store
            .update(|candidates| {
                let before = candidates.len();
                candidates.retain(|c| c.id != id);
                if candidates.len() == before {
                    return Err(Error::NotFound(format!("Candidate {} not found", id)));
                }
                Ok(())
            })
            .await
    }
}
