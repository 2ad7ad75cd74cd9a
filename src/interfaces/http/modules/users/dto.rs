//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{RegisterUser, UpdateUser};
use crate::domain::User;

/// Registration payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 64, message = "password must be 8-64 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(min = 9, max = 20, message = "phone number must be 9-20 characters"))]
    pub phone_number: Option<String>,
}

impl From<UserRequest> for RegisterUser {
    fn from(r: UserRequest) -> Self {
        Self {
            email: r.email,
            password: r.password,
            name: r.name,
            phone_number: r.phone_number,
        }
    }
}

/// Partial profile update; omitted fields keep their current value.
/// Email is the login name and cannot be changed here.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UserUpdateRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 9, max = 20, message = "phone number must be 9-20 characters"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 8, max = 64, message = "password must be 8-64 characters"))]
    pub password: Option<String>,
}

impl From<UserUpdateRequest> for UpdateUser {
    fn from(r: UserUpdateRequest) -> Self {
        Self {
            name: r.name,
            phone_number: r.phone_number,
            password: r.password,
        }
    }
}

/// Public user representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            phone_number: u.phone_number,
            role: u.role.as_str().to_string(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}
