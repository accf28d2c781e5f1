use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::submission_dto::{CleanupRequest, CleanupResponse, NewSubmission, SubmissionPatch},
    error::Result,
    models::submission::SubmissionFilter,
    AppState,
};

#[axum::debug_handler]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(filter): Query<SubmissionFilter>,
) -> Result<impl IntoResponse> {
    let submissions = state.submission_service.list_submissions(&filter).await?;
    Ok(Json(submissions))
}

#[axum::debug_handler]
pub async fn create_submission(
    State(state): State<AppState>,
    Json(payload): Json<NewSubmission>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let submission = state.submission_service.create_submission(payload).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

#[axum::debug_handler]
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.submission_service.get_submission(&id).await?))
}

#[axum::debug_handler]
pub async fn patch_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SubmissionPatch>,
) -> Result<impl IntoResponse> {
    let submission = state.submission_service.patch_submission(&id, patch).await?;
    Ok(Json(submission))
}

#[axum::debug_handler]
pub async fn cleanup_submissions(
    State(state): State<AppState>,
    Json(payload): Json<CleanupRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let removed = state
        .submission_service
        .cleanup_incomplete_submissions(
            &payload.candidate_id,
            &payload.test_id,
            &payload.keep_submission_id,
        )
        .await?;
    Ok(Json(CleanupResponse {
        message: format!("Removed {} incomplete submission(s)", removed),
        removed,
    }))
}
