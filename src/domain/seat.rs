//! Study-room seat entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Occupancy state of a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    Free,
    Reserved,
    Occupied,
}

impl std::str::FromStr for SeatStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Free" => Ok(SeatStatus::Free),
            "Reserved" => Ok(SeatStatus::Reserved),
            "Occupied" => Ok(SeatStatus::Occupied),
            other => Err(AppError::internal(format!("unknown seat status: {other}"))),
        }
    }
}

impl std::fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatStatus::Free => write!(f, "Free"),
            SeatStatus::Reserved => write!(f, "Reserved"),
            SeatStatus::Occupied => write!(f, "Occupied"),
        }
    }
}

/// A reservable seat.
///
/// `current_user_id` is set exactly while the seat is Reserved or
/// Occupied; a Free seat carries no user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: Uuid,
    pub seat_number: String,
    pub status: SeatStatus,
    pub current_user_id: Option<Uuid>,
}

impl Seat {
    /// Create a free seat.
    pub fn new(seat_number: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            seat_number,
            status: SeatStatus::Free,
            current_user_id: None,
        }
    }

    /// Reserve the seat for a user.
    ///
    /// Fails with `NotAvailable` unless the seat is Free.
    pub fn reserve(mut self, user_id: Uuid) -> AppResult<Self> {
        if self.status != SeatStatus::Free {
            return Err(AppError::NotAvailable);
        }
        self.status = SeatStatus::Reserved;
        self.current_user_id = Some(user_id);
        Ok(self)
    }

    /// Mark the seat occupied. The reservation guards the transition
    /// order; the seat only mirrors it.
    pub fn occupy(mut self) -> Self {
        self.status = SeatStatus::Occupied;
        self
    }

    /// Return the seat to the free pool and clear the user.
    pub fn release(mut self) -> Self {
        self.status = SeatStatus::Free;
        self.current_user_id = None;
        self
    }

    /// Administrative override: set the status directly, skipping the
    /// reservation state machine. Forcing Free clears the user
    /// regardless of reservation bookkeeping.
    pub fn force_status(mut self, status: SeatStatus) -> Self {
        self.status = status;
        if status == SeatStatus::Free {
            self.current_user_id = None;
        }
        self
    }

    pub fn is_free(&self) -> bool {
        self.status == SeatStatus::Free
    }
}
