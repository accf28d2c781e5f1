use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};

use crate::{dto::assessment_dto::UserListQuery, error::Result, models::user::User, AppState};

/// Lists users, or the single user matching `?email=`.
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse> {
    let users: Vec<User> = match query.email {
        Some(email) => state
            .user_service
            .get_by_email(&email)
            .await?
            .into_iter()
            .collect(),
        None => state.user_service.list_users().await?,
    };
    Ok(Json(users))
}
