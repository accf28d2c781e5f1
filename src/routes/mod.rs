pub mod candidates;
pub mod health;
pub mod questions;
pub mod submissions;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/api/questions/:id",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        )
        .route("/api/tests", get(tests::list_tests).post(tests::create_test))
        .route(
            "/api/tests/:id",
            get(tests::get_test_by_id)
                .patch(tests::update_test)
                .delete(tests::delete_test),
        )
        .route(
            "/api/candidates",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate)
                .patch(candidates::update_candidate)
                .delete(candidates::delete_candidate),
        )
        .route("/api/users", get(users::list_users))
        .route(
            "/api/submissions",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route(
            "/api/submissions/cleanup",
            post(submissions::cleanup_submissions),
        )
        .route(
            "/api/submissions/:id",
            get(submissions::get_submission).patch(submissions::patch_submission),
        )
        .with_state(state)
}
