//! Book catalog entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Book catalog entry.
///
/// Invariants: `0 <= available_count <= total_count` and
/// `is_available == (available_count > 0)`. All mutation goes through
/// the methods below, which preserve both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub year: i32,
    pub total_count: i32,
    pub available_count: i32,
    pub is_available: bool,
    pub category: Option<String>,
}

/// Data required to register a new book
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub year: i32,
    pub total_count: i32,
    pub category: Option<String>,
}

impl Book {
    /// Create a catalog entry with all copies available.
    pub fn new(new: NewBook) -> AppResult<Self> {
        if new.total_count < 0 {
            return Err(AppError::validation("total_count must not be negative"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title: new.title,
            author: new.author,
            isbn: new.isbn,
            publisher: new.publisher,
            year: new.year,
            total_count: new.total_count,
            available_count: new.total_count,
            is_available: new.total_count > 0,
            category: new.category,
        })
    }

    /// Take one copy out of the available pool.
    ///
    /// Fails with `OutOfStock` when no copy is left; the entry is
    /// returned unchanged in that case (the caller still holds it).
    pub fn borrow_copy(mut self) -> AppResult<Self> {
        if self.available_count <= 0 {
            return Err(AppError::OutOfStock);
        }
        self.available_count -= 1;
        self.is_available = self.available_count > 0;
        Ok(self)
    }

    /// Put one copy back into the available pool, capped at `total_count`.
    pub fn return_copy(mut self) -> Self {
        if self.available_count < self.total_count {
            self.available_count += 1;
        }
        self.is_available = self.available_count > 0;
        self
    }

    /// Validate an edited entry and recompute the derived flag.
    ///
    /// Used by catalog updates where counts arrive from the caller.
    pub fn validated(mut self) -> AppResult<Self> {
        if self.total_count < 0 || self.available_count < 0 || self.available_count > self.total_count
        {
            return Err(AppError::validation(
                "available_count must be between 0 and total_count",
            ));
        }
        self.is_available = self.available_count > 0;
        Ok(self)
    }
}
