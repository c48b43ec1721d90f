//! Repository layer - Data access abstraction
//!
//! One trait per entity, implemented by a `*Store` over a SeaORM
//! connection. Loan and reservation rows are query-only here: every
//! multi-entity write goes through the unit of work so a borrow or a
//! seat transition can never be half-applied.

mod book_repository;
mod loan_repository;
mod reservation_repository;
mod seat_repository;
mod user_repository;

pub(crate) mod entities;

pub use book_repository::{BookRepository, BookStore};
pub use loan_repository::{LoanRepository, LoanStore};
pub use reservation_repository::{ReservationRepository, ReservationStore};
pub use seat_repository::{SeatRepository, SeatStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use book_repository::MockBookRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use loan_repository::MockLoanRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use reservation_repository::MockReservationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use seat_repository::MockSeatRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
