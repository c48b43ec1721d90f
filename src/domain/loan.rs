//! Borrow record entity and its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Lifecycle of a borrow record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

impl std::str::FromStr for BorrowStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Borrowed" => Ok(BorrowStatus::Borrowed),
            "Returned" => Ok(BorrowStatus::Returned),
            other => Err(AppError::internal(format!(
                "unknown borrow status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BorrowStatus::Borrowed => write!(f, "Borrowed"),
            BorrowStatus::Returned => write!(f, "Returned"),
        }
    }
}

/// One lending transaction for a (user, book) pair.
///
/// A record with `return_date == None` is open; at most one open record
/// exists per pair (enforced by `LendingService`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub borrow_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: BorrowStatus,
}

impl BorrowRecord {
    /// Open a new record at `borrow_date`.
    pub fn open(book_id: Uuid, user_id: Uuid, borrow_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            book_id,
            borrow_date,
            return_date: None,
            status: BorrowStatus::Borrowed,
        }
    }

    /// Close the record at `return_date`.
    ///
    /// Fails with `AlreadyReturned` when the record is not open.
    pub fn close(mut self, return_date: DateTime<Utc>) -> AppResult<Self> {
        if self.return_date.is_some() || self.status == BorrowStatus::Returned {
            return Err(AppError::AlreadyReturned);
        }
        self.return_date = Some(return_date);
        self.status = BorrowStatus::Returned;
        Ok(self)
    }

    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_record_has_no_return_date() {
        let record = BorrowRecord::open(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        assert!(record.is_open());
        assert_eq!(record.status, BorrowStatus::Borrowed);
    }

    #[test]
    fn close_sets_date_and_status() {
        let record = BorrowRecord::open(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        let closed = record.close(Utc::now()).unwrap();
        assert!(!closed.is_open());
        assert_eq!(closed.status, BorrowStatus::Returned);
    }

    #[test]
    fn closing_twice_fails() {
        let record = BorrowRecord::open(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        let closed = record.close(Utc::now()).unwrap();
        assert!(matches!(
            closed.close(Utc::now()),
            Err(AppError::AlreadyReturned)
        ));
    }
}
