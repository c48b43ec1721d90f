//! Domain layer - entities, status enums, and invariant-bearing transitions.
//!
//! Entities are plain value types; the methods that move them between
//! states carry the lending/reservation invariants so the state machines
//! can be tested without any persistence.

mod book;
mod loan;
mod password;
mod reservation;
mod seat;
mod user;

pub use book::{Book, NewBook};
pub use loan::{BorrowRecord, BorrowStatus};
pub use password::Password;
pub use reservation::{ReservationStatus, SeatReservation};
pub use seat::{Seat, SeatStatus};
pub use user::{User, UserRole};
