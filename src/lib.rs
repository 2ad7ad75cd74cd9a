//! # Bookstore Users
//!
//! REST service for bookstore user accounts: registration, login and the
//! self-service profile endpoints under `/api/v1/users`.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: User model, DTOs and the repository trait
//! - **application**: `UserService`, the use cases behind every endpoint
//! - **infrastructure**: SeaORM persistence, in-memory storage, JWT and bcrypt
//! - **interfaces**: HTTP router, auth middleware and handlers
//! - **support**: Error types and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, run_migrations, DatabaseConfig, InMemoryUserRepository};

// Re-export API router
pub use interfaces::http::create_api_router;
