//! Application services layer - use cases and business logic.
//!
//! Services orchestrate domain transitions through the Unit of Work;
//! they hold no mutable state of their own and may be called
//! concurrently.

mod account_service;
pub mod container;
mod lending_service;
mod reservation_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use lending_service::{BookStatistics, LendingManager, LendingService, LoanStatistics};
pub use reservation_service::{ReservationManager, ReservationService, SeatStatistics};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
