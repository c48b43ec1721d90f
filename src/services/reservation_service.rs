//! Reservation service - the seat occupancy state machine.
//!
//! A seat and its active reservation move together:
//! Free -> Reserved -> Occupied -> Free (reservation Completed). Every
//! transition validates the current state and persists seat and
//! reservation in one unit of work.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MAX_SEAT_NUMBER_LENGTH;
use crate::domain::{Seat, SeatReservation, SeatStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Seat occupancy counters for dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatStatistics {
    pub total: u64,
    pub free: u64,
    pub reserved: u64,
    pub occupied: u64,
}

/// Reservation service trait for dependency injection.
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Reserve a free seat for a user (one active reservation per user).
    async fn reserve_seat(&self, seat_id: Uuid, user_id: Uuid) -> AppResult<SeatReservation>;

    /// Check in: Reserved -> Occupied.
    async fn check_in(&self, reservation_id: Uuid) -> AppResult<SeatReservation>;

    /// Check out: Occupied -> Completed; the seat returns to Free.
    async fn check_out(&self, reservation_id: Uuid) -> AppResult<SeatReservation>;

    /// The user's active reservation, if any
    async fn active_reservation(&self, user_id: Uuid) -> AppResult<Option<SeatReservation>>;

    /// All active reservations
    async fn list_active_reservations(&self) -> AppResult<Vec<SeatReservation>>;

    /// A user's reservation history, newest first
    async fn reservation_history(&self, user_id: Uuid) -> AppResult<Vec<SeatReservation>>;

    /// Add a seat with a unique number; it starts Free.
    async fn add_seat(&self, seat_number: String) -> AppResult<Seat>;

    /// Delete a seat; false when absent.
    async fn delete_seat(&self, seat_id: Uuid) -> AppResult<bool>;

    /// Administrative override: force a seat status, bypassing the
    /// reservation state machine. Forcing Free clears the current user.
    async fn set_seat_status(&self, seat_id: Uuid, status: SeatStatus) -> AppResult<Seat>;

    /// List all seats
    async fn list_seats(&self) -> AppResult<Vec<Seat>>;

    /// Seat occupancy counters
    async fn seat_statistics(&self) -> AppResult<SeatStatistics>;
}

/// Concrete implementation of ReservationService using Unit of Work.
pub struct ReservationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReservationManager<U> {
    /// Create new reservation service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ReservationService for ReservationManager<U> {
    async fn reserve_seat(&self, seat_id: Uuid, user_id: Uuid) -> AppResult<SeatReservation> {
        let seat = self
            .uow
            .seats()
            .find_by_id(seat_id)
            .await?
            .ok_or_not_found()?;

        // NotAvailable takes precedence over the per-user conflict
        let seat = seat.reserve(user_id)?;

        if self
            .uow
            .reservations()
            .find_active_by_user(user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "the user already holds an active seat reservation",
            ));
        }

        let reservation = SeatReservation::new(seat_id, user_id, Utc::now());
        self.uow.create_reservation(seat, reservation).await
    }

    async fn check_in(&self, reservation_id: Uuid) -> AppResult<SeatReservation> {
        let reservation = self
            .uow
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_not_found()?;

        let reservation = reservation.check_in(Utc::now())?;

        let seat = self
            .uow
            .seats()
            .find_by_id(reservation.seat_id)
            .await?
            .ok_or_not_found()?;

        self.uow.update_reservation(seat.occupy(), reservation).await
    }

    async fn check_out(&self, reservation_id: Uuid) -> AppResult<SeatReservation> {
        let reservation = self
            .uow
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_not_found()?;

        let reservation = reservation.check_out(Utc::now())?;

        let seat = self
            .uow
            .seats()
            .find_by_id(reservation.seat_id)
            .await?
            .ok_or_not_found()?;

        self.uow.update_reservation(seat.release(), reservation).await
    }

    async fn active_reservation(&self, user_id: Uuid) -> AppResult<Option<SeatReservation>> {
        self.uow.reservations().find_active_by_user(user_id).await
    }

    async fn list_active_reservations(&self) -> AppResult<Vec<SeatReservation>> {
        self.uow.reservations().list_active().await
    }

    async fn reservation_history(&self, user_id: Uuid) -> AppResult<Vec<SeatReservation>> {
        self.uow.reservations().list_by_user(user_id).await
    }

    async fn add_seat(&self, seat_number: String) -> AppResult<Seat> {
        let seat_number = seat_number.trim().to_string();
        if seat_number.is_empty() || seat_number.len() > MAX_SEAT_NUMBER_LENGTH {
            return Err(AppError::validation(format!(
                "seat number must be 1..={} characters",
                MAX_SEAT_NUMBER_LENGTH
            )));
        }

        if self.uow.seats().exists_by_number(&seat_number).await? {
            return Err(AppError::conflict("a seat with this number already exists"));
        }

        self.uow.seats().insert(Seat::new(seat_number)).await
    }

    async fn delete_seat(&self, seat_id: Uuid) -> AppResult<bool> {
        self.uow.seats().delete(seat_id).await
    }

    async fn set_seat_status(&self, seat_id: Uuid, status: SeatStatus) -> AppResult<Seat> {
        let seat = self
            .uow
            .seats()
            .find_by_id(seat_id)
            .await?
            .ok_or_not_found()?;

        self.uow.seats().update(seat.force_status(status)).await
    }

    async fn list_seats(&self) -> AppResult<Vec<Seat>> {
        self.uow.seats().list().await
    }

    async fn seat_statistics(&self) -> AppResult<SeatStatistics> {
        let seats = self.uow.seats();
        let total = seats.count().await?;
        let free = seats.count_by_status(SeatStatus::Free).await?;
        let reserved = seats.count_by_status(SeatStatus::Reserved).await?;
        let occupied = seats.count_by_status(SeatStatus::Occupied).await?;

        Ok(SeatStatistics {
            total,
            free,
            reserved,
            occupied,
        })
    }
}
