//! Account service - registration and basic credential checks.
//!
//! No tokens or sessions here; the embedding application owns those.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account with a unique username.
    async fn register(&self, username: String, password: String, role: UserRole)
        -> AppResult<User>;

    /// Verify credentials and return the account.
    async fn login(&self, username: &str, password: &str) -> AppResult<User>;

    /// Get an account by ID
    async fn get_profile(&self, user_id: Uuid) -> AppResult<User>;

    /// Change the password after verifying the old one.
    async fn change_password(&self, user_id: Uuid, old: &str, new: &str) -> AppResult<()>;

    /// List all accounts
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Case-insensitive username search
    async fn search_users(&self, keyword: &str) -> AppResult<Vec<User>>;

    /// Delete an account; false when absent.
    async fn delete_user(&self, user_id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    /// Create new account service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn register(
        &self,
        username: String,
        password: String,
        role: UserRole,
    ) -> AppResult<User> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::validation("username must not be empty"));
        }

        if self.uow.users().find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("username already taken"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow
            .users()
            .insert(User::register(username, password_hash, role))
            .await
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let found = self.uow.users().find_by_username(username).await?;

        // Verify against a dummy hash when the user is unknown so the
        // response time does not reveal which usernames exist.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let stored = match &found {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::from_hash(dummy_hash.to_string()),
        };

        // Always run the verification, even against the dummy hash
        let password_valid = stored.verify(password);

        match found {
            Some(user) if password_valid => Ok(user),
            _ => {
                tracing::warn!("Failed login attempt for username: {}", username);
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn get_profile(&self, user_id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found()
    }

    async fn change_password(&self, user_id: Uuid, old: &str, new: &str) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found()?;

        if !Password::from_hash(user.password_hash).verify(old) {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = Password::new(new)?.into_string();
        self.uow.users().update_password(user_id, password_hash).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn search_users(&self, keyword: &str) -> AppResult<Vec<User>> {
        self.uow.users().search(keyword).await
    }

    async fn delete_user(&self, user_id: Uuid) -> AppResult<bool> {
        self.uow.users().delete(user_id).await
    }
}
