//! Lending service - borrow/return and catalog management.
//!
//! All inventory invariants live here and in the `Book`/`BorrowRecord`
//! transition methods; preconditions are validated before anything is
//! handed to the unit of work, and the two-row writes (record + book)
//! are committed atomically.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Book, BorrowRecord, NewBook};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Catalog-level counters for dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookStatistics {
    /// Cataloged titles
    pub total_titles: u64,
    /// Titles with at least one available copy
    pub available_titles: u64,
    /// Currently open borrow records
    pub open_loans: u64,
}

/// Borrow record counters for dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanStatistics {
    pub total: u64,
    pub open: u64,
    pub returned: u64,
}

/// Lending service trait for dependency injection.
#[async_trait]
pub trait LendingService: Send + Sync {
    /// Borrow a book for a user, decrementing the available count.
    async fn borrow_book(&self, book_id: Uuid, user_id: Uuid) -> AppResult<BorrowRecord>;

    /// Return a borrowed book, closing the record and restocking a copy.
    async fn return_book(&self, record_id: Uuid) -> AppResult<BorrowRecord>;

    /// Register a new book; all copies start available.
    async fn add_book(&self, new: NewBook) -> AppResult<Book>;

    /// Persist an edited catalog entry.
    async fn update_book(&self, book: Book) -> AppResult<Book>;

    /// Delete a book with no open borrow records; false when absent.
    async fn delete_book(&self, book_id: Uuid) -> AppResult<bool>;

    /// Get a book by ID
    async fn get_book(&self, book_id: Uuid) -> AppResult<Book>;

    /// List the whole catalog
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    /// List books that can currently be borrowed
    async fn list_available_books(&self) -> AppResult<Vec<Book>>;

    /// Case-insensitive keyword search over title, author, ISBN,
    /// publisher
    async fn search_books(&self, keyword: &str) -> AppResult<Vec<Book>>;

    /// A user's borrow history, newest first
    async fn borrow_history(&self, user_id: Uuid) -> AppResult<Vec<BorrowRecord>>;

    /// Catalog counters
    async fn book_statistics(&self) -> AppResult<BookStatistics>;

    /// Borrow record counters
    async fn loan_statistics(&self) -> AppResult<LoanStatistics>;
}

/// Concrete implementation of LendingService using Unit of Work.
pub struct LendingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> LendingManager<U> {
    /// Create new lending service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> LendingService for LendingManager<U> {
    async fn borrow_book(&self, book_id: Uuid, user_id: Uuid) -> AppResult<BorrowRecord> {
        let book = self
            .uow
            .books()
            .find_by_id(book_id)
            .await?
            .ok_or_not_found()?;

        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found()?;

        // OutOfStock takes precedence over the duplicate check
        let book = book.borrow_copy()?;

        if self.uow.loans().find_open(book_id, user_id).await?.is_some() {
            return Err(AppError::AlreadyBorrowed);
        }

        let record = BorrowRecord::open(book_id, user_id, Utc::now());
        self.uow.create_loan(book, record).await
    }

    async fn return_book(&self, record_id: Uuid) -> AppResult<BorrowRecord> {
        let record = self
            .uow
            .loans()
            .find_by_id(record_id)
            .await?
            .ok_or_not_found()?;

        let record = record.close(Utc::now())?;

        let book = self
            .uow
            .books()
            .find_by_id(record.book_id)
            .await?
            .ok_or_not_found()?;

        let book = book.return_copy();
        self.uow.close_loan(book, record).await
    }

    async fn add_book(&self, new: NewBook) -> AppResult<Book> {
        if self.uow.books().exists_by_isbn(&new.isbn).await? {
            return Err(AppError::conflict("a book with this ISBN already exists"));
        }

        let book = Book::new(new)?;
        self.uow.books().insert(book).await
    }

    async fn update_book(&self, book: Book) -> AppResult<Book> {
        let current = self
            .uow
            .books()
            .find_by_id(book.id)
            .await?
            .ok_or_not_found()?;

        if book.isbn != current.isbn && self.uow.books().exists_by_isbn(&book.isbn).await? {
            return Err(AppError::conflict("a book with this ISBN already exists"));
        }

        let book = book.validated()?;
        self.uow.books().update(book).await
    }

    async fn delete_book(&self, book_id: Uuid) -> AppResult<bool> {
        if self.uow.loans().has_open_for_book(book_id).await? {
            return Err(AppError::conflict("the book still has open borrow records"));
        }

        self.uow.books().delete(book_id).await
    }

    async fn get_book(&self, book_id: Uuid) -> AppResult<Book> {
        self.uow
            .books()
            .find_by_id(book_id)
            .await?
            .ok_or_not_found()
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.uow.books().list().await
    }

    async fn list_available_books(&self) -> AppResult<Vec<Book>> {
        self.uow.books().list_available().await
    }

    async fn search_books(&self, keyword: &str) -> AppResult<Vec<Book>> {
        self.uow.books().search(keyword).await
    }

    async fn borrow_history(&self, user_id: Uuid) -> AppResult<Vec<BorrowRecord>> {
        self.uow.loans().list_by_user(user_id).await
    }

    async fn book_statistics(&self) -> AppResult<BookStatistics> {
        let books = self.uow.books();
        let total_titles = books.count().await?;
        let available_titles = books.count_available().await?;
        let open_loans = self.uow.loans().count_open().await?;

        Ok(BookStatistics {
            total_titles,
            available_titles,
            open_loans,
        })
    }

    async fn loan_statistics(&self) -> AppResult<LoanStatistics> {
        let loans = self.uow.loans();
        let total = loans.count().await?;
        let open = loans.count_open().await?;

        // The two counts are separate queries; records opened in between
        // can make open exceed total.
        Ok(LoanStatistics {
            total,
            open,
            returned: total.saturating_sub(open),
        })
    }
}
