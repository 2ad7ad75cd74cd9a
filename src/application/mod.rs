//! Application layer - use cases orchestrating the domain

pub mod identity;

pub use identity::{AuthResult, RegisterUser, UpdateUser, UserService};
