//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::UserService;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, health, metrics, request_id, users};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        users::create_user,
        users::get_current_user,
        users::update_current_user,
        users::delete_current_user,
        users::get_user,
    ),
    components(
        schemas(
            ApiResponse<String>,
            auth::LoginRequest,
            auth::LoginResponse,
            users::UserRequest,
            users::UserUpdateRequest,
            users::UserResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Login and JWT issuance"),
        (name = "Users", description = "Registration and self-service user profile"),
    ),
    info(
        title = "Bookstore Users API",
        version = "1.0.0",
        description = "REST API for bookstore user accounts",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `db` feeds the health check (omit it for the in-memory store);
/// `/metrics` is mounted only when a Prometheus handle is supplied.
pub fn create_api_router(
    user_service: Arc<UserService>,
    db: Option<DatabaseConnection>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    let auth_state = AuthState {
        user_service: user_service.clone(),
    };
    let user_state = users::UserHandlerState {
        user_service: user_service.clone(),
    };

    // User routes (public)
    let user_public_routes = Router::new()
        .route("/register", post(users::create_user))
        .with_state(user_state.clone());

    // User routes (protected)
    let user_protected_routes = Router::new()
        .route(
            "/me",
            get(users::get_current_user)
                .put(users::update_current_user)
                .delete(users::delete_current_user),
        )
        .route("/{user_id}", get(users::get_user))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(user_state);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth::AuthHandlerState { user_service });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest(
            "/api/v1/users",
            user_public_routes.merge(user_protected_routes),
        );

    if let Some(handle) = prometheus_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use utoipa::OpenApi;

    use super::ApiDoc;
    use crate::interfaces::http::testing::TestApp;

    #[test]
    fn openapi_documents_every_user_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/users/register",
            "/api/v1/users/me",
            "/api/v1/users/{user_id}",
            "/api/v1/auth/login",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[tokio::test]
    async fn openapi_json_is_served() {
        let app = TestApp::new();
        let (status, body) = app.get("/api-doc/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "Bookstore Users API");
    }

    #[tokio::test]
    async fn metrics_route_is_absent_without_a_recorder() {
        let app = TestApp::new();
        let (status, _) = app.get("/metrics", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_on_register_is_not_treated_as_a_user_id() {
        let app = TestApp::new();
        let (status, _) = app.get("/api/v1/users/register", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
