//! In-memory user repository for development and testing

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, UpdateUserDto, User, UserRepositoryInterface,
};

/// Users keyed by id, plus an email index that enforces uniqueness.
pub struct InMemoryUserRepository {
    users: DashMap<i64, User>,
    emails: DashMap<String, i64>,
    id_counter: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            id_counter: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        // Reserving the email first makes check-and-insert atomic.
        let id = match self.emails.entry(dto.email.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict("Email already exists".to_string()))
            }
            Entry::Vacant(slot) => {
                let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
                slot.insert(id);
                id
            }
        };

        let now = Utc::now();
        let user = User {
            id,
            email: dto.email,
            password_hash: dto.password_hash,
            name: dto.name,
            phone_number: dto.phone_number,
            role: dto.role,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        self.get_user_by_id(id).await
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn update_user(&self, id: i64, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(None);
        };

        if dto.is_empty() {
            return Ok(Some(user.clone()));
        }

        if let Some(name) = dto.name {
            user.name = name;
        }
        if let Some(phone_number) = dto.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(password_hash) = dto.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> DomainResult<()> {
        let Some((_, user)) = self.users.remove(&id) else {
            return Err(DomainError::user_not_found(id));
        };
        self.emails.remove(&user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn new_user(email: &str) -> CreateUserDto {
        CreateUserDto {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "Reader".to_string(),
            phone_number: None,
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_and_emails_unique() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(new_user("a@example.com")).await.unwrap();
        let b = repo.create_user(new_user("b@example.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let err = repo.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(repo.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_frees_the_email() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create_user(new_user("a@example.com")).await.unwrap();

        repo.delete_user(user.id).await.unwrap();
        assert!(repo.get_user_by_email("a@example.com").await.unwrap().is_none());
        assert!(matches!(
            repo.delete_user(user.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));

        let again = repo.create_user(new_user("a@example.com")).await.unwrap();
        assert_ne!(again.id, user.id);
    }

    #[tokio::test]
    async fn update_of_missing_user_is_none() {
        let repo = InMemoryUserRepository::new();
        let result = repo
            .update_user(99, UpdateUserDto { name: Some("x".into()), ..Default::default() })
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
