//! Authentication middleware for Axum
//!
//! Resolves the bearer token to a stored user and attaches it to the request
//! as the `AuthenticatedUser` principal. Handlers behind this middleware read
//! the caller's identity only from that extension.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use crate::application::identity::TOKEN_EXPIRED;
use crate::application::UserService;
use crate::domain::{DomainError, User};
use crate::interfaces::http::common::{ApiError, ApiResponse};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    UnknownUser,
}

/// Authentication state
#[derive(Clone)]
pub struct AuthState {
    pub user_service: Arc<UserService>,
}

/// The principal attached to authenticated requests.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    let claims = match auth_state.user_service.verify_token(token) {
        Ok(claims) => claims,
        Err(DomainError::Unauthorized(reason)) if reason == TOKEN_EXPIRED => {
            return auth_error_response(AuthError::ExpiredToken);
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            return auth_error_response(AuthError::InvalidToken);
        }
    };

    let Some(user_id) = claims.user_id() else {
        return auth_error_response(AuthError::InvalidToken);
    };

    // The token may outlive the account it was issued for.
    let user = match auth_state.user_service.find_user_by_id(user_id).await {
        Ok(user) => user,
        Err(DomainError::NotFound { .. }) => {
            warn!(user_id, "Valid token for a user that no longer exists");
            return auth_error_response(AuthError::UnknownUser);
        }
        Err(e) => return ApiError(e).into_response(),
    };

    request.extensions_mut().insert(AuthenticatedUser { user });
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let message = match error {
        AuthError::MissingToken => "Missing authentication token",
        AuthError::InvalidToken => "Invalid authentication token",
        AuthError::ExpiredToken => "Token has expired",
        AuthError::UnknownUser => "User no longer exists",
    };

    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("Bearer   "), None);
        assert_eq!(extract_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_token("abc.def"), None);
    }
}
