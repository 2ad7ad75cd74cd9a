//! Identity commands
//!
//! Plain inputs for the mutating use-cases. The HTTP layer converts its
//! validated request bodies into these.

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
}
