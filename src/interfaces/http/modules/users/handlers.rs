//! User API handlers
//!
//! Registration is public. The `/me` endpoints act on the authenticated
//! principal only and never take a user id from the client.
//! Delegates to `UserService` from the application/identity layer.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{UserRequest, UserResponse, UserUpdateRequest};
use crate::application::UserService;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created; body is the new user id", body = i64),
        (status = 400, description = "Malformed JSON", body = ApiResponse<String>),
        (status = 409, description = "Email already registered", body = ApiResponse<String>),
        (status = 422, description = "Validation error", body = ApiResponse<String>)
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> Result<(StatusCode, Json<i64>), ApiError> {
    let id = state.user_service.create_user(request.into()).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ApiResponse<String>)
    )
)]
pub async fn get_current_user(
    Extension(principal): Extension<AuthenticatedUser>,
) -> Json<UserResponse> {
    Json(UserResponse::from(principal.user))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ApiResponse<String>),
        (status = 422, description = "Validation error", body = ApiResponse<String>)
    )
)]
pub async fn update_current_user(
    State(state): State<UserHandlerState>,
    Extension(principal): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UserUpdateRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .update_user(principal.id(), request.into())
        .await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Not authenticated", body = ApiResponse<String>)
    )
)]
pub async fn delete_current_user(
    State(state): State<UserHandlerState>,
    Extension(principal): Extension<AuthenticatedUser>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete_user(principal.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ApiResponse<String>),
        (status = 404, description = "Not found", body = ApiResponse<String>)
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.find_user_by_id(user_id).await?;
    Ok(Json(UserResponse::from(user)))
}
