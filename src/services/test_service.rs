use std::collections::HashMap;

use crate::dto::assessment_dto::{CreateTestPayload, UpdateTestPayload};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::test::Test;
use crate::storage::json_store::JsonStore;
use crate::utils::{id::generate_id, time::now};

#[derive(Debug, Default)]
pub struct TestFilter {
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct TestService {
    store: JsonStore<Test>,
    questions: JsonStore<Question>,
}

impl TestService {
    pub fn new(store: JsonStore<Test>, questions: JsonStore<Question>) -> Self {
        Self { store, questions }
    }

    pub async fn create_test(&self, payload: CreateTestPayload) -> Result<Test> {
        let total_points = self.total_points_for(&payload.question_ids).await?;

        let ts = now();
        let test = Test {
            id: generate_id(),
            title: payload.title,
            description: payload.description,
            question_ids: payload.question_ids,
            time_limit_minutes: payload.time_limit_minutes,
            total_points,
            is_active: payload.is_active.unwrap_or(true),
            created_at: ts,
            updated_at: ts,
        };

        let created = test.clone();
        self.store
            .update(move |tests| {
                tests.push(test);
                Ok(())
            })
            .await?;
        tracing::info!(test_id = %created.id, total_points = created.total_points, "Test created");
        Ok(created)
    }

    pub async fn get_test_by_id(&self, test_id: &str) -> Result<Test> {
        self.store
            .read_all()
            .await?
            .into_iter()
            .find(|t| t.id == test_id)
            .ok_or_else(|| Error::NotFound(format!("Test {} not found", test_id)))
    }

    pub async fn update_test(&self, test_id: &str, payload: UpdateTestPayload) -> Result<Test> {
        let total_points = match &payload.question_ids {
            Some(ids) => Some(self.total_points_for(ids).await?),
            None => None,
        };

        self.store
            .update(|tests| {
                let test = tests
                    .iter_mut()
                    .find(|t| t.id == test_id)
                    .ok_or_else(|| Error::NotFound(format!("Test {} not found", test_id)))?;

                if let Some(title) = payload.title {
                    test.title = title;
                }
                if let Some(description) = payload.description {
                    test.description = description;
                }
                if let (Some(ids), Some(total)) = (payload.question_ids, total_points) {
                    test.question_ids = ids;
                    test.total_points = total;
                }
                if let Some(minutes) = payload.time_limit_minutes {
                    test.time_limit_minutes = minutes;
                }
                if let Some(active) = payload.is_active {
                    test.is_active = active;
                }
                test.updated_at = now();
                Ok(test.clone())
            })
            .await
    }

    pub async fn list_tests(&self, filter: Option<TestFilter>) -> Result<Vec<Test>> {
        let filter = filter.unwrap_or_default();
        let search = filter.search.map(|s| s.to_lowercase());

        let tests = self
            .store
            .read_all()
            .await?
            .into_iter()
            .filter(|t| filter.is_active.map_or(true, |active| t.is_active == active))
            .filter(|t| {
                search.as_deref().map_or(true, |needle| {
                    t.title.to_lowercase().contains(needle)
                        || t.description.to_lowercase().contains(needle)
                })
            })
            .collect();
        Ok(tests)
    }

    pub async fn delete_test(&self, test_id: &str) -> Result<()> {
        self.store
            .update(|tests| {
                let before = tests.len();
                tests.retain(|t| t.id != test_id);
                if tests.len() == before {
                    return Err(Error::NotFound(format!("Test {} not found", test_id)));
                }
                Ok(())
            })
            .await
    }

    /// Sum of the referenced questions' points. Unknown ids are rejected.
    async fn total_points_for(&self, question_ids: &[String]) -> Result<u32> {
        let points: HashMap<String, u32> = self
            .questions
            .read_all()
            .await?
            .into_iter()
            .map(|q| (q.id, q.points))
            .collect();

        let missing: Vec<&str> = question_ids
            .iter()
            .filter(|id| !points.contains_key(id.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(Error::BadRequest(format!(
                "Unknown question ids: {}",
                missing.join(", ")
            )));
        }

        Ok(question_ids.iter().filter_map(|id| points.get(id)).sum())
    }
}
