//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{LoginRequest, LoginResponse};
use crate::application::UserService;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::users::UserResponse;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = ApiResponse<String>),
        (status = 422, description = "Validation error", body = ApiResponse<String>)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let auth = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: UserResponse::from(auth.user),
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::interfaces::http::testing::{register, TestApp, TEST_PASSWORD};

    #[tokio::test]
    async fn login_returns_a_bearer_token() {
        let app = TestApp::new();
        let id = register(&app, "reader@example.com").await;

        let (status, body) = app
            .post(
                "/api/v1/auth/login",
                None,
                json!({"email": "reader@example.com", "password": TEST_PASSWORD}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["token_type"], "Bearer");
        assert_eq!(body["data"]["expires_in"], 3600);
        assert_eq!(body["data"]["user"]["id"], json!(id));
        assert!(body["data"]["token"].as_str().is_some());
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = TestApp::new();
        register(&app, "reader@example.com").await;

        let (status, body) = app
            .post(
                "/api/v1/auth/login",
                None,
                json!({"email": "reader@example.com", "password": "wrong-password"}),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }
}
