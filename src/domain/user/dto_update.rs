/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUserDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none() && self.password_hash.is_none()
    }
}
