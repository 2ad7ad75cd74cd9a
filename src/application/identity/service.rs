//! User management service — application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use tracing::{debug, info};

use super::commands::{RegisterUser, UpdateUser};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, UpdateUserDto, User, UserRepositoryInterface,
    UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig, TokenClaims};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// bcrypt ignores everything past this many bytes of input.
const MAX_PASSWORD_BYTES: usize = 72;

/// Reason carried by `DomainError::Unauthorized` for tokens past their `exp`.
pub const TOKEN_EXPIRED: &str = "Token has expired";

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// User service — orchestrates all identity / user-management use-cases.
pub struct UserService {
    repo: Arc<dyn UserRepositoryInterface>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepositoryInterface>,
        jwt_config: JwtConfig,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repo,
            jwt_config,
            bcrypt_cost,
        }
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(DomainError::Validation(format!(
                "password: must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a JWT.
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = normalize_email(email);

        let Some(user) = self.repo.get_user_by_email(&email).await? else {
            debug!(email = %email, "Login attempt for unknown email");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let token = create_token(user.id, &user.email, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        info!(user_id = user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_seconds(),
            user,
        })
    }

    /// Decode a bearer token into its claims.
    pub fn verify_token(&self, token: &str) -> DomainResult<TokenClaims> {
        let claims = verify_token(token, &self.jwt_config).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => DomainError::Unauthorized(TOKEN_EXPIRED.into()),
            _ => DomainError::Unauthorized(format!("Invalid token: {}", e)),
        })?;
        if claims.is_expired() {
            return Err(DomainError::Unauthorized(TOKEN_EXPIRED.into()));
        }
        Ok(claims)
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user with the default role and return its id.
    pub async fn create_user(&self, cmd: RegisterUser) -> DomainResult<i64> {
        self.insert_user(cmd, UserRole::User).await
    }

    async fn insert_user(&self, cmd: RegisterUser, role: UserRole) -> DomainResult<i64> {
        let email = normalize_email(&cmd.email);
        let name = normalize_name(&cmd.name)?;

        if self.repo.get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        let dto = CreateUserDto {
            email,
            password_hash: self.hash(&cmd.password)?,
            name,
            phone_number: cmd.phone_number,
            role,
        };

        let user = self.repo.create_user(dto).await?;

        info!(user_id = user.id, role = user.role.as_str(), "New user registered");
        Ok(user.id)
    }

    /// Create the configured admin account when no users exist yet.
    /// Returns the new id, or `None` when the store was already populated.
    pub async fn ensure_admin(&self, cmd: RegisterUser) -> DomainResult<Option<i64>> {
        if self.repo.count_users().await? > 0 {
            return Ok(None);
        }
        self.insert_user(cmd, UserRole::Admin).await.map(Some)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn find_user_by_id(&self, id: i64) -> DomainResult<User> {
        self.repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Apply a partial update; a new password is re-hashed.
    pub async fn update_user(&self, id: i64, cmd: UpdateUser) -> DomainResult<User> {
        let name = cmd.name.as_deref().map(normalize_name).transpose()?;
        let password_hash = match cmd.password.as_deref() {
            Some(password) => Some(self.hash(password)?),
            None => None,
        };

        let dto = UpdateUserDto {
            name,
            phone_number: cmd.phone_number,
            password_hash,
        };
        let changed_password = dto.password_hash.is_some();

        let user = self
            .repo
            .update_user(id, dto)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        info!(user_id = id, changed_password, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> DomainResult<()> {
        self.repo.delete_user(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn normalize_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("name: must not be blank".into()));
    }
    Ok(name.to_string())
}
