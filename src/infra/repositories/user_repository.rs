//! User repository implementation.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by unique username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new account
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// Delete an account; returns false when no such user exists
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// List all accounts, ordered by username
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Case-insensitive username search
    async fn search(&self, keyword: &str) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn insert(&self, new_user: User) -> AppResult<User> {
        let model = ActiveModel::from(&new_user)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = existing.into();
        active.password_hash = Set(password_hash);
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn search(&self, keyword: &str) -> AppResult<Vec<User>> {
        let pattern = format!("%{}%", keyword.to_lowercase());
        let models = UserEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(user::Column::Username))).like(&pattern))
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
