//! Bookstore user service.
//!
//! Reads configuration from a TOML file (~/.config/bookstore/config.toml,
//! or the path in `BOOKSTORE_CONFIG`).

use std::sync::Arc;

use bookstore_users::application::{RegisterUser, UserService};
use bookstore_users::config::AppConfig;
use bookstore_users::domain::UserRepositoryInterface;
use bookstore_users::infrastructure::crypto::jwt::JwtConfig;
use bookstore_users::infrastructure::database::repositories::UserRepository;
use bookstore_users::support::shutdown::ShutdownCoordinator;
use bookstore_users::{
    create_api_router, default_config_path, init_database, run_migrations, DatabaseConfig,
    InMemoryUserRepository,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("BOOKSTORE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg.logging.level, cfg.logging.json);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            init_tracing("info", false);
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting bookstore user service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = match metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
            None
        }
    };

    let jwt_config = JwtConfig::from_security(&app_cfg.security);
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Storage ────────────────────────────────────────────────
    let (repo, db) = if app_cfg.database.is_memory() {
        warn!("Using in-memory user store; data is lost on restart");
        let repo: Arc<dyn UserRepositoryInterface> = Arc::new(InMemoryUserRepository::new());
        (repo, None)
    } else {
        let db_config = DatabaseConfig {
            url: app_cfg.database.url.clone(),
        };
        let db = init_database(&db_config).await.map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;
        run_migrations(&db).await.map_err(|e| {
            error!("Failed to run migrations: {}", e);
            e
        })?;
        let repo: Arc<dyn UserRepositoryInterface> = Arc::new(UserRepository::new(db.clone()));
        (repo, Some(db))
    };

    let user_service = Arc::new(UserService::new(
        repo,
        jwt_config,
        app_cfg.security.bcrypt_cost,
    ));

    if app_cfg.admin.enabled {
        create_default_admin(&user_service, &app_cfg).await;
    }

    // ── HTTP server ────────────────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    shutdown.start_signal_listener();

    let api_router = create_api_router(user_service, db.clone(), prometheus_handle);

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown.signal();
    let served = axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await;

    if let Err(e) = &served {
        error!("REST API server error: {}", e);
    }

    // ── Cleanup ────────────────────────────────────────────────
    shutdown
        .cleanup_with_timeout(|| async move {
            if let Some(db) = db {
                match db.close().await {
                    Ok(()) => info!("Database connection closed"),
                    Err(e) => warn!("Error closing database connection: {}", e),
                }
            }
        })
        .await;

    info!("Bookstore user service shutdown complete");
    served.map_err(Into::into)
}

/// `RUST_LOG` wins over the configured level when set
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Seed the configured admin account if the user store is empty
async fn create_default_admin(user_service: &UserService, app_cfg: &AppConfig) {
    let admin = RegisterUser {
        email: app_cfg.admin.email.clone(),
        password: app_cfg.admin.password.clone(),
        name: app_cfg.admin.name.clone(),
        phone_number: None,
    };

    match user_service.ensure_admin(admin).await {
        Ok(Some(id)) => {
            info!(user_id = id, "Default admin created: {}", app_cfg.admin.email);
            warn!("Please change the admin password immediately!");
        }
        Ok(None) => {}
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}
