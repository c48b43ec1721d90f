//! Borrow record queries.
//!
//! Query-only by design: records are created and closed through the unit
//! of work together with the book they touch.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::borrow_record::{self, Entity as BorrowRecordEntity};
use crate::domain::BorrowRecord;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Borrow record repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Find a borrow record by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BorrowRecord>>;

    /// Find the open record for a (book, user) pair, if any
    async fn find_open(&self, book_id: Uuid, user_id: Uuid) -> AppResult<Option<BorrowRecord>>;

    /// Check whether any open record references the book
    async fn has_open_for_book(&self, book_id: Uuid) -> AppResult<bool>;

    /// Borrow history for a user, newest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<BorrowRecord>>;

    /// Total number of records
    async fn count(&self) -> AppResult<u64>;

    /// Number of open records
    async fn count_open(&self) -> AppResult<u64>;
}

/// Concrete implementation of LoanRepository
pub struct LoanStore {
    db: DatabaseConnection,
}

impl LoanStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoanRepository for LoanStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BorrowRecord>> {
        let result = BorrowRecordEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(BorrowRecord::try_from).transpose()
    }

    async fn find_open(&self, book_id: Uuid, user_id: Uuid) -> AppResult<Option<BorrowRecord>> {
        let result = BorrowRecordEntity::find()
            .filter(borrow_record::Column::BookId.eq(book_id))
            .filter(borrow_record::Column::UserId.eq(user_id))
            .filter(borrow_record::Column::ReturnDate.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(BorrowRecord::try_from).transpose()
    }

    async fn has_open_for_book(&self, book_id: Uuid) -> AppResult<bool> {
        let open = BorrowRecordEntity::find()
            .filter(borrow_record::Column::BookId.eq(book_id))
            .filter(borrow_record::Column::ReturnDate.is_null())
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(open > 0)
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<BorrowRecord>> {
        let models = BorrowRecordEntity::find()
            .filter(borrow_record::Column::UserId.eq(user_id))
            .order_by_desc(borrow_record::Column::BorrowDate)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(BorrowRecord::try_from).collect()
    }

    async fn count(&self) -> AppResult<u64> {
        BorrowRecordEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_open(&self) -> AppResult<u64> {
        BorrowRecordEntity::find()
            .filter(borrow_record::Column::ReturnDate.is_null())
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
