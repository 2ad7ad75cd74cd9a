//! Identity module — user management & authentication
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: registration, login, profile reads, updates and deletion.

pub mod commands;
pub mod service;

pub use commands::{RegisterUser, UpdateUser};
pub use service::{AuthResult, UserService, TOKEN_EXPIRED};
