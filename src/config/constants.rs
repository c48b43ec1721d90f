//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Accounts
// =============================================================================

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "Admin";

/// Default role assigned to new users
pub const ROLE_USER: &str = "User";

// =============================================================================
// Study room
// =============================================================================

/// Maximum accepted seat number length
pub const MAX_SEAT_NUMBER_LENGTH: usize = 10;

// =============================================================================
// Database
// =============================================================================

/// Fallback connection string for local development
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/libris";

/// Default maximum number of pooled connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
