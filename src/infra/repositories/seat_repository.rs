//! Seat repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::seat::{self, ActiveModel, Entity as SeatEntity};
use crate::domain::{Seat, SeatStatus};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Seat repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SeatRepository: Send + Sync {
    /// Find a seat by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Seat>>;

    /// List all seats, ordered by seat number
    async fn list(&self) -> AppResult<Vec<Seat>>;

    /// Check whether a seat with this number already exists
    async fn exists_by_number(&self, seat_number: &str) -> AppResult<bool>;

    /// Insert a new seat
    async fn insert(&self, seat: Seat) -> AppResult<Seat>;

    /// Persist a seat state change made outside the reservation
    /// transitions (administrative override)
    async fn update(&self, seat: Seat) -> AppResult<Seat>;

    /// Delete a seat; returns false when no such seat exists
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Total number of seats
    async fn count(&self) -> AppResult<u64>;

    /// Number of seats currently in the given state
    async fn count_by_status(&self, status: SeatStatus) -> AppResult<u64>;
}

/// Concrete implementation of SeatRepository
pub struct SeatStore {
    db: DatabaseConnection,
}

impl SeatStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SeatRepository for SeatStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Seat>> {
        let result = SeatEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(Seat::try_from).transpose()
    }

    async fn list(&self) -> AppResult<Vec<Seat>> {
        let models = SeatEntity::find()
            .order_by_asc(seat::Column::SeatNumber)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(Seat::try_from).collect()
    }

    async fn exists_by_number(&self, seat_number: &str) -> AppResult<bool> {
        let found = SeatEntity::find()
            .filter(seat::Column::SeatNumber.eq(seat_number))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(found.is_some())
    }

    async fn insert(&self, new_seat: Seat) -> AppResult<Seat> {
        let model = ActiveModel::from(&new_seat)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Seat::try_from(model)
    }

    async fn update(&self, seat: Seat) -> AppResult<Seat> {
        let existing = SeatEntity::find_by_id(seat.id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = existing.into();
        active.seat_number = Set(seat.seat_number);
        active.status = Set(seat.status.to_string());
        active.current_user_id = Set(seat.current_user_id);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Seat::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = SeatEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        SeatEntity::find().count(&self.db).await.map_err(AppError::from)
    }

    async fn count_by_status(&self, status: SeatStatus) -> AppResult<u64> {
        SeatEntity::find()
            .filter(seat::Column::Status.eq(status.to_string()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
