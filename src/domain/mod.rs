pub mod user;

// Re-export commonly used types
pub use user::{CreateUserDto, UpdateUserDto, User, UserRepositoryInterface, UserRole};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
