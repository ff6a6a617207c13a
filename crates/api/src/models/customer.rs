//! Customer profile models.
//!
//! A customer is the commerce-domain profile attached 1:1 to a user. It is
//! never created through the API; provisioning happens automatically when
//! the user record is created.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cartwheel_core::{CustomerId, Membership, UserId};

/// A customer profile.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: UserId,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub membership: Membership,
}

/// Payload for updating a customer profile.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    pub phone: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub membership: Membership,
}
