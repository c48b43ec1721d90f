//! Libris - library and study-room management core.
//!
//! Catalog management, user accounts, book lending, and seat
//! reservation, exposed as domain services over a repository
//! abstraction. There is no UI or wire protocol here; an embedding
//! application (desktop shell, HTTP layer, test harness) calls the
//! services and presents their typed errors.
//!
//! # Architecture Layers
//!
//! - **config**: Application configuration and constants
//! - **domain**: Entities, status enums, and invariant-bearing
//!   transitions
//! - **services**: Lending, reservation, and account use cases
//! - **infra**: SeaORM repositories and the Unit of Work
//! - **errors**: Centralized error handling

pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{
    Book, BorrowRecord, BorrowStatus, NewBook, Password, ReservationStatus, Seat, SeatReservation,
    SeatStatus, User, UserRole,
};
pub use errors::{AppError, AppResult};
pub use infra::{Database, Persistence, UnitOfWork};
pub use services::{
    AccountService, LendingService, ReservationService, ServiceContainer, Services,
};
