//! Automatic customer provisioning.
//!
//! Every identity gets exactly one customer profile, created right after the
//! identity itself. The listener is idempotent: the underlying insert is
//! `ON CONFLICT DO NOTHING`, so replays of the event can never produce a
//! second profile.

use sqlx::PgPool;

use crate::db::CustomerRepository;
use crate::models::User;

use super::signals::{HookFuture, UserCreatedHook};

/// User-created listener that provisions the linked customer profile with
/// the default membership tier.
pub struct CustomerProvisioner {
    pool: PgPool,
}

impl CustomerProvisioner {
    /// Create a provisioner bound to the application pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserCreatedHook for CustomerProvisioner {
    fn user_created<'a>(&'a self, user: &'a User) -> HookFuture<'a> {
        Box::pin(async move {
            match CustomerRepository::new(&self.pool).provision(user.id).await {
                Ok(true) => {
                    tracing::info!(user_id = %user.id, "customer profile provisioned");
                }
                Ok(false) => {
                    tracing::debug!(user_id = %user.id, "customer profile already exists");
                }
                Err(err) => {
                    // Listeners must not fail the request that emitted the event.
                    tracing::error!(user_id = %user.id, error = %err, "customer provisioning failed");
                }
            }
        })
    }
}
