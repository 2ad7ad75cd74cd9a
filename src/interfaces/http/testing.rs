//! Test harness: the full router over an in-memory repository.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use tower::Service;

use crate::application::UserService;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::storage::InMemoryUserRepository;
use crate::interfaces::http::create_api_router;

pub const TEST_PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub service: Arc<UserService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Same app with `/metrics` mounted over `handle`.
    pub fn with_metrics(handle: PrometheusHandle) -> Self {
        Self::build(Some(handle))
    }

    fn build(prometheus_handle: Option<PrometheusHandle>) -> Self {
        let jwt = JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: JwtConfig::ISSUER.to_string(),
        };
        let service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            jwt,
            4,
        ));
        let router = create_api_router(service.clone(), None, prometheus_handle);
        Self { router, service }
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let mut svc = self.router.clone().into_service();
        let resp = svc.call(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, uri, token, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    pub async fn delete_raw(&self, uri: &str, token: Option<&str>) -> (StatusCode, Vec<u8>) {
        self.send_raw(Method::DELETE, uri, token, None).await
    }
}

/// Register a user named "Reader" with `TEST_PASSWORD`; returns the id.
pub async fn register(app: &TestApp, email: &str) -> i64 {
    let (status, body) = app
        .post(
            "/api/v1/users/register",
            None,
            json!({"email": email, "password": TEST_PASSWORD, "name": "Reader"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body.as_i64().unwrap()
}

/// Log in with `TEST_PASSWORD`; returns the bearer token.
pub async fn login(app: &TestApp, email: &str) -> String {
    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": email, "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}
