//! Service Container - centralized service access.
//!
//! Wires the persistence layer into the three domain services; the
//! embedding application holds one container and hands out trait
//! objects.

use std::sync::Arc;

use super::{AccountService, LendingService, ReservationService};
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get lending service
    fn lending(&self) -> Arc<dyn LendingService>;

    /// Get reservation service
    fn reservations(&self) -> Arc<dyn ReservationService>;

    /// Get account service
    fn accounts(&self) -> Arc<dyn AccountService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    lending_service: Arc<dyn LendingService>,
    reservation_service: Arc<dyn ReservationService>,
    account_service: Arc<dyn AccountService>,
}

impl Services {
    /// Create a new service container from already-built services
    pub fn new(
        lending_service: Arc<dyn LendingService>,
        reservation_service: Arc<dyn ReservationService>,
        account_service: Arc<dyn AccountService>,
    ) -> Self {
        Self {
            lending_service,
            reservation_service,
            account_service,
        }
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        use super::{AccountManager, LendingManager, ReservationManager};

        let uow = Arc::new(Persistence::new(db));

        Self {
            lending_service: Arc::new(LendingManager::new(uow.clone())),
            reservation_service: Arc::new(ReservationManager::new(uow.clone())),
            account_service: Arc::new(AccountManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn lending(&self) -> Arc<dyn LendingService> {
        self.lending_service.clone()
    }

    fn reservations(&self) -> Arc<dyn ReservationService> {
        self.reservation_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }
}
