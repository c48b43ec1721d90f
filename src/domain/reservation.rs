//! Seat reservation entity and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Lifecycle of a seat reservation: Reserved -> Occupied -> Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Reserved,
    Occupied,
    Completed,
}

impl ReservationStatus {
    /// Active reservations hold their seat.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Reserved | ReservationStatus::Occupied)
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Reserved" => Ok(ReservationStatus::Reserved),
            "Occupied" => Ok(ReservationStatus::Occupied),
            "Completed" => Ok(ReservationStatus::Completed),
            other => Err(AppError::internal(format!(
                "unknown reservation status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Reserved => write!(f, "Reserved"),
            ReservationStatus::Occupied => write!(f, "Occupied"),
            ReservationStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// One reservation session for a (user, seat) pair.
///
/// At most one active session exists per user and per seat; the seat's
/// own status mirrors the active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatReservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub seat_id: Uuid,
    pub reserve_time: DateTime<Utc>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: ReservationStatus,
}

impl SeatReservation {
    /// Start a session in the Reserved state.
    pub fn new(seat_id: Uuid, user_id: Uuid, reserve_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            seat_id,
            reserve_time,
            check_in_time: None,
            check_out_time: None,
            status: ReservationStatus::Reserved,
        }
    }

    /// Check in: Reserved -> Occupied.
    pub fn check_in(mut self, at: DateTime<Utc>) -> AppResult<Self> {
        if self.status != ReservationStatus::Reserved {
            return Err(AppError::InvalidTransition(
                "only a reserved session can check in",
            ));
        }
        self.status = ReservationStatus::Occupied;
        self.check_in_time = Some(at);
        Ok(self)
    }

    /// Check out: Occupied -> Completed (terminal).
    pub fn check_out(mut self, at: DateTime<Utc>) -> AppResult<Self> {
        if self.status != ReservationStatus::Occupied {
            return Err(AppError::InvalidTransition(
                "only an occupied session can check out",
            ));
        }
        self.status = ReservationStatus::Completed;
        self.check_out_time = Some(at);
        Ok(self)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SeatReservation {
        SeatReservation::new(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn lifecycle_runs_in_order() {
        let r = session();
        assert!(r.is_active());

        let r = r.check_in(Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::Occupied);
        assert!(r.check_in_time.is_some());
        assert!(r.is_active());

        let r = r.check_out(Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::Completed);
        assert!(r.check_out_time.is_some());
        assert!(!r.is_active());
    }

    #[test]
    fn check_out_before_check_in_fails() {
        assert!(matches!(
            session().check_out(Utc::now()),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn double_check_in_fails() {
        let r = session().check_in(Utc::now()).unwrap();
        assert!(matches!(
            r.check_in(Utc::now()),
            Err(AppError::InvalidTransition(_))
        ));
    }
}
