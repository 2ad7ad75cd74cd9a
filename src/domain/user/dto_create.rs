use super::UserRole;

/// Fields required to persist a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
}
