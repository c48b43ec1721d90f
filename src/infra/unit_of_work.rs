//! Unit of Work - atomic multi-entity writes.
//!
//! Every lending or reservation operation mutates two rows at once (a
//! book plus its borrow record, or a seat plus its reservation). The
//! trait exposes the repositories for reads and exactly four composite
//! writes for those pairs; `Persistence` runs each composite write in a
//! single serializable transaction, so a half-applied borrow or seat
//! transition can never be observed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IsolationLevel, Set, TransactionTrait,
};

use super::repositories::entities::{book, borrow_record, seat, seat_reservation};
use super::repositories::{
    BookRepository, BookStore, LoanRepository, LoanStore, ReservationRepository, ReservationStore,
    SeatRepository, SeatStore, UserRepository, UserStore,
};
use crate::domain::{Book, BorrowRecord, Seat, SeatReservation};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Unit of Work trait for dependency injection.
///
/// Provides repository access for reads and single-row writes, plus the
/// composite writes that must not be torn apart.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get book repository
    fn books(&self) -> Arc<dyn BookRepository>;

    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get borrow record repository
    fn loans(&self) -> Arc<dyn LoanRepository>;

    /// Get seat repository
    fn seats(&self) -> Arc<dyn SeatRepository>;

    /// Get seat reservation repository
    fn reservations(&self) -> Arc<dyn ReservationRepository>;

    /// Insert a new borrow record and persist the decremented book in
    /// one transaction.
    async fn create_loan(&self, book: Book, record: BorrowRecord) -> AppResult<BorrowRecord>;

    /// Persist a closed borrow record and the restocked book in one
    /// transaction.
    async fn close_loan(&self, book: Book, record: BorrowRecord) -> AppResult<BorrowRecord>;

    /// Insert a new reservation and persist the reserved seat in one
    /// transaction.
    async fn create_reservation(
        &self,
        seat: Seat,
        reservation: SeatReservation,
    ) -> AppResult<SeatReservation>;

    /// Persist a reservation transition (check-in/check-out) and its
    /// seat in one transaction.
    async fn update_reservation(
        &self,
        seat: Seat,
        reservation: SeatReservation,
    ) -> AppResult<SeatReservation>;
}

/// Concrete implementation of UnitOfWork over a SeaORM connection.
pub struct Persistence {
    db: DatabaseConnection,
    books: Arc<BookStore>,
    users: Arc<UserStore>,
    loans: Arc<LoanStore>,
    seats: Arc<SeatStore>,
    reservations: Arc<ReservationStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            books: Arc::new(BookStore::new(db.clone())),
            users: Arc::new(UserStore::new(db.clone())),
            loans: Arc::new(LoanStore::new(db.clone())),
            seats: Arc::new(SeatStore::new(db.clone())),
            reservations: Arc::new(ReservationStore::new(db.clone())),
            db,
        }
    }

    /// Run a closure inside one serializable transaction.
    ///
    /// Committed on success, rolled back on error. Serializable isolation
    /// makes the database the serialization point for two concurrent
    /// borrows of the last copy or two reservations of the same seat.
    async fn execute<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            )
                -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'c>>
            + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        match f(&txn).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Write the inventory fields of an already-validated book state.
/// Re-reads the row inside the transaction; a vanished row is NotFound.
async fn apply_book(txn: &DatabaseTransaction, state: &Book) -> AppResult<()> {
    let existing = book::Entity::find_by_id(state.id)
        .one(txn)
        .await?
        .ok_or_not_found()?;

    let mut active: book::ActiveModel = existing.into();
    active.available_count = Set(state.available_count);
    active.is_available = Set(state.is_available);
    active.update(txn).await.map_err(AppError::from)?;
    Ok(())
}

/// Write the occupancy fields of a seat.
async fn apply_seat(txn: &DatabaseTransaction, state: &Seat) -> AppResult<()> {
    let existing = seat::Entity::find_by_id(state.id)
        .one(txn)
        .await?
        .ok_or_not_found()?;

    let mut active: seat::ActiveModel = existing.into();
    active.status = Set(state.status.to_string());
    active.current_user_id = Set(state.current_user_id);
    active.update(txn).await.map_err(AppError::from)?;
    Ok(())
}

/// Write the closing fields of a borrow record.
async fn apply_record(txn: &DatabaseTransaction, state: &BorrowRecord) -> AppResult<BorrowRecord> {
    let existing = borrow_record::Entity::find_by_id(state.id)
        .one(txn)
        .await?
        .ok_or_not_found()?;

    let mut active: borrow_record::ActiveModel = existing.into();
    active.return_date = Set(state.return_date);
    active.status = Set(state.status.to_string());

    let model = active.update(txn).await.map_err(AppError::from)?;
    BorrowRecord::try_from(model)
}

/// Write the transition fields of a reservation.
async fn apply_reservation(
    txn: &DatabaseTransaction,
    state: &SeatReservation,
) -> AppResult<SeatReservation> {
    let existing = seat_reservation::Entity::find_by_id(state.id)
        .one(txn)
        .await?
        .ok_or_not_found()?;

    let mut active: seat_reservation::ActiveModel = existing.into();
    active.check_in_time = Set(state.check_in_time);
    active.check_out_time = Set(state.check_out_time);
    active.status = Set(state.status.to_string());

    let model = active.update(txn).await.map_err(AppError::from)?;
    SeatReservation::try_from(model)
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn books(&self) -> Arc<dyn BookRepository> {
        self.books.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn loans(&self) -> Arc<dyn LoanRepository> {
        self.loans.clone()
    }

    fn seats(&self) -> Arc<dyn SeatRepository> {
        self.seats.clone()
    }

    fn reservations(&self) -> Arc<dyn ReservationRepository> {
        self.reservations.clone()
    }

    async fn create_loan(&self, book: Book, record: BorrowRecord) -> AppResult<BorrowRecord> {
        self.execute(move |txn| {
            Box::pin(async move {
                apply_book(txn, &book).await?;

                let model = borrow_record::ActiveModel::from(&record)
                    .insert(txn)
                    .await
                    .map_err(AppError::from)?;
                BorrowRecord::try_from(model)
            })
        })
        .await
    }

    async fn close_loan(&self, book: Book, record: BorrowRecord) -> AppResult<BorrowRecord> {
        self.execute(move |txn| {
            Box::pin(async move {
                apply_book(txn, &book).await?;
                apply_record(txn, &record).await
            })
        })
        .await
    }

    async fn create_reservation(
        &self,
        seat: Seat,
        reservation: SeatReservation,
    ) -> AppResult<SeatReservation> {
        self.execute(move |txn| {
            Box::pin(async move {
                apply_seat(txn, &seat).await?;

                let model = seat_reservation::ActiveModel::from(&reservation)
                    .insert(txn)
                    .await
                    .map_err(AppError::from)?;
                SeatReservation::try_from(model)
            })
        })
        .await
    }

    async fn update_reservation(
        &self,
        seat: Seat,
        reservation: SeatReservation,
    ) -> AppResult<SeatReservation> {
        self.execute(move |txn| {
            Box::pin(async move {
                apply_seat(txn, &seat).await?;
                apply_reservation(txn, &reservation).await
            })
        })
        .await
    }
}
