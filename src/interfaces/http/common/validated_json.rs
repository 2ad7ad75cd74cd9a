//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value.
//! Malformed bodies are rejected with 400, constraint violations with 422
//! and a `field: message` list.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

/// Error type for `ValidatedJson` extraction failures.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// Body missing, not JSON, or not the expected shape.
    JsonError(JsonRejection),
    /// Body parsed but violates field constraints.
    ValidationError(ValidationErrors),
}

/// Flatten validator output into `field: message` strings, sorted so the
/// response is stable across runs.
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection.body_text()));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let body = ApiResponse::<()>::error(describe(&errors));
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "invalid email format"))]
        email: String,
        #[validate(length(min = 8, message = "too short"))]
        password: String,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<Signup>) -> &'static str {
        "ok"
    }

    async fn send(body: Body) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = Router::new().route("/signup", post(handler)).into_service();
        let req = Request::builder()
            .method("POST")
            .uri("/signup")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        svc.call(req).await.unwrap()
    }

    async fn error_text(resp: axum::http::Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        body["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let body = serde_json::json!({"email": "a@example.com", "password": "long-enough"});
        let resp = send(Body::from(body.to_string())).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let resp = send(Body::from("not json")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_text(resp).await.starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn constraint_violations_are_422_with_every_field_listed() {
        let body = serde_json::json!({"email": "nope", "password": "short"});
        let resp = send(Body::from(body.to_string())).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            error_text(resp).await,
            "email: invalid email format; password: too short"
        );
    }
}
