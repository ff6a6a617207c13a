//! Minimal identity record.
//!
//! Identity management (passwords, sessions, token rotation) is out of
//! scope; a user exists so the access policy has a role to resolve and so
//! customer provisioning has a creation event to react to.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cartwheel_core::{Role, UserId};

/// An authenticated identity. The api token is never serialized here; it is
/// returned exactly once, at creation.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Policy role for this user.
    #[must_use]
    pub const fn role(&self) -> Role {
        if self.is_staff {
            Role::Staff
        } else {
            Role::Authenticated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_staff: bool) -> User {
        User {
            id: UserId::new(1),
            email: "a@example.com".to_owned(),
            is_staff,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn staff_flag_maps_to_role() {
        assert_eq!(user(false).role(), Role::Authenticated);
        assert_eq!(user(true).role(), Role::Staff);
    }
}
