//! User domain entity and roles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case(ROLE_ADMIN) {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User account. The role is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
}

impl User {
    /// Create an account from an already-hashed password.
    pub fn register(username: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(UserRole::from("Admin"), UserRole::Admin);
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("User"), UserRole::User);
        assert_eq!(UserRole::from(UserRole::Admin.to_string().as_str()), UserRole::Admin);
    }

    #[test]
    fn unknown_role_defaults_to_user() {
        assert_eq!(UserRole::from("librarian"), UserRole::User);
    }
}
