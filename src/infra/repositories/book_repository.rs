//! Book repository implementation.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::book::{self, ActiveModel, Entity as BookEntity};
use crate::domain::Book;
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Book repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find a book by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// List the whole catalog, ordered by title
    async fn list(&self) -> AppResult<Vec<Book>>;

    /// List books with at least one available copy
    async fn list_available(&self) -> AppResult<Vec<Book>>;

    /// Case-insensitive keyword search over title, author, ISBN and
    /// publisher (logical OR)
    async fn search(&self, keyword: &str) -> AppResult<Vec<Book>>;

    /// Check whether a book with this ISBN is already cataloged
    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool>;

    /// Insert a new catalog entry
    async fn insert(&self, book: Book) -> AppResult<Book>;

    /// Persist an edited catalog entry
    async fn update(&self, book: Book) -> AppResult<Book>;

    /// Delete a book; returns false when no such book exists
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Total number of cataloged titles
    async fn count(&self) -> AppResult<u64>;

    /// Number of titles with at least one available copy
    async fn count_available(&self) -> AppResult<u64>;
}

/// Concrete implementation of BookRepository
pub struct BookStore {
    db: DatabaseConnection,
}

impl BookStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `LOWER(column) LIKE %keyword%` for one column
fn matches_keyword(column: book::Column, pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(pattern)
}

#[async_trait]
impl BookRepository for BookStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let result = BookEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Book::from))
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let models = BookEntity::find()
            .order_by_asc(book::Column::Title)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn list_available(&self) -> AppResult<Vec<Book>> {
        let models = BookEntity::find()
            .filter(book::Column::AvailableCount.gt(0))
            .order_by_asc(book::Column::Title)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn search(&self, keyword: &str) -> AppResult<Vec<Book>> {
        let pattern = format!("%{}%", keyword.to_lowercase());
        let condition = Condition::any()
            .add(matches_keyword(book::Column::Title, &pattern))
            .add(matches_keyword(book::Column::Author, &pattern))
            .add(matches_keyword(book::Column::Isbn, &pattern))
            .add(matches_keyword(book::Column::Publisher, &pattern));

        let models = BookEntity::find()
            .filter(condition)
            .order_by_asc(book::Column::Title)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let found = BookEntity::find()
            .filter(book::Column::Isbn.eq(isbn))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(found.is_some())
    }

    async fn insert(&self, book: Book) -> AppResult<Book> {
        let model = ActiveModel::from(&book)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Book::from(model))
    }

    async fn update(&self, book: Book) -> AppResult<Book> {
        let existing = BookEntity::find_by_id(book.id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(book.title);
        active.author = Set(book.author);
        active.isbn = Set(book.isbn);
        active.publisher = Set(book.publisher);
        active.year = Set(book.year);
        active.total_count = Set(book.total_count);
        active.available_count = Set(book.available_count);
        active.is_available = Set(book.is_available);
        active.category = Set(book.category);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Book::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = BookEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        BookEntity::find().count(&self.db).await.map_err(AppError::from)
    }

    async fn count_available(&self) -> AppResult<u64> {
        BookEntity::find()
            .filter(book::Column::AvailableCount.gt(0))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
