use async_trait::async_trait;

use super::{CreateUserDto, UpdateUserDto, User};
use crate::support::errors::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Persists a new user. Fails with `Conflict` when the email is taken.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    async fn update_user(&self, id: i64, dto: UpdateUserDto) -> DomainResult<Option<User>>;
    /// Fails with `NotFound` when no row was removed.
    async fn delete_user(&self, id: i64) -> DomainResult<()>;
}
