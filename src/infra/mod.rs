//! Infrastructure layer - persistence behind the repository abstraction.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::Database;
pub use repositories::{
    BookRepository, BookStore, LoanRepository, LoanStore, ReservationRepository, ReservationStore,
    SeatRepository, SeatStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBookRepository, MockLoanRepository, MockReservationRepository, MockSeatRepository,
    MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;
