pub mod json_store;
pub mod seed;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{
    candidate::Candidate, question::Question, submission::Submission, test::Test, user::User,
};
use json_store::JsonStore;

pub const QUESTIONS_FILE: &str = "questions.json";
pub const TESTS_FILE: &str = "tests.json";
pub const CANDIDATES_FILE: &str = "candidates.json";
pub const SUBMISSIONS_FILE: &str = "submissions.json";
pub const USERS_FILE: &str = "users.json";

/// One independent JSON document per entity type, all under one data directory.
#[derive(Clone)]
pub struct DataStore {
    data_dir: PathBuf,
    pub questions: JsonStore<Question>,
    pub tests: JsonStore<Test>,
    pub candidates: JsonStore<Candidate>,
    pub submissions: JsonStore<Submission>,
    pub users: JsonStore<User>,
}

impl DataStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            questions: JsonStore::new(data_dir.join(QUESTIONS_FILE)),
            tests: JsonStore::new(data_dir.join(TESTS_FILE)),
            candidates: JsonStore::new(data_dir.join(CANDIDATES_FILE)),
            submissions: JsonStore::new(data_dir.join(SUBMISSIONS_FILE)),
            users: JsonStore::new(data_dir.join(USERS_FILE)),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

pub async fn open_store(data_dir: impl Into<PathBuf>, seed_demo_data: bool) -> Result<DataStore> {
    let store = DataStore::new(data_dir);
    tokio::fs::create_dir_all(store.data_dir()).await?;
    if seed_demo_data {
        seed::seed_demo_data(&store).await?;
    }
    tracing::info!(data_dir = %store.data_dir().display(), "Data store ready");
    Ok(store)
}
