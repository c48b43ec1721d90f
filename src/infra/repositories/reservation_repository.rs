//! Seat reservation queries.
//!
//! Query-only by design: reservations are created and transitioned
//! through the unit of work together with their seat.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::seat_reservation::{self, Entity as ReservationEntity};
use crate::domain::{ReservationStatus, SeatReservation};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Active sessions hold a seat: Reserved or Occupied.
fn active_statuses() -> [String; 2] {
    [
        ReservationStatus::Reserved.to_string(),
        ReservationStatus::Occupied.to_string(),
    ]
}

/// Seat reservation repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find a reservation by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SeatReservation>>;

    /// Find the user's active reservation, if any (newest first when
    /// history contains stale rows)
    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Option<SeatReservation>>;

    /// List all active reservations
    async fn list_active(&self) -> AppResult<Vec<SeatReservation>>;

    /// Reservation history for a user, newest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<SeatReservation>>;
}

/// Concrete implementation of ReservationRepository
pub struct ReservationStore {
    db: DatabaseConnection,
}

impl ReservationStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReservationRepository for ReservationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SeatReservation>> {
        let result = ReservationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(SeatReservation::try_from).transpose()
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Option<SeatReservation>> {
        let result = ReservationEntity::find()
            .filter(seat_reservation::Column::UserId.eq(user_id))
            .filter(seat_reservation::Column::Status.is_in(active_statuses()))
            .order_by_desc(seat_reservation::Column::ReserveTime)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(SeatReservation::try_from).transpose()
    }

    async fn list_active(&self) -> AppResult<Vec<SeatReservation>> {
        let models = ReservationEntity::find()
            .filter(seat_reservation::Column::Status.is_in(active_statuses()))
            .order_by_desc(seat_reservation::Column::ReserveTime)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(SeatReservation::try_from).collect()
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<SeatReservation>> {
        let models = ReservationEntity::find()
            .filter(seat_reservation::Column::UserId.eq(user_id))
            .order_by_desc(seat_reservation::Column::ReserveTime)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(SeatReservation::try_from).collect()
    }
}
