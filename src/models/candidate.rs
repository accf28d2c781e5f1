use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub assigned_tests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn is_assigned(&self, test_id: &str) -> bool {
        self.assigned_tests.iter().any(|t| t == test_id)
    }
}
