pub mod backend;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;
pub mod widgets;

use crate::services::{
    candidate_service::CandidateService, question_service::QuestionService,
    submission_service::SubmissionService, test_service::TestService, user_service::UserService,
};
use crate::storage::DataStore;

#[derive(Clone)]
pub struct AppState {
    pub store: DataStore,
    pub question_service: QuestionService,
    pub test_service: TestService,
    pub candidate_service: CandidateService,
    pub submission_service: SubmissionService,
    pub user_service: UserService,
}

impl AppState {
    pub fn new(store: DataStore) -> Self {
        let question_service = QuestionService::new(store.questions.clone());
        let test_service = TestService::new(store.tests.clone(), store.questions.clone());
        let candidate_service = CandidateService::new(store.candidates.clone());
        let submission_service = SubmissionService::new(store.submissions.clone());
        let user_service = UserService::new(store.users.clone());

        Self {
            store,
            question_service,
            test_service,
            candidate_service,
            submission_service,
            user_service,
        }
    }
}
