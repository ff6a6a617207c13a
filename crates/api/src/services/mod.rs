//! Application services.
//!
//! - [`signals`] - Post-commit observer registry (the signal mechanism)
//! - [`provisioning`] - Identity-created listener that creates the customer
//! - [`orders`] - The order placement workflow (the one transactional unit)

pub mod orders;
pub mod provisioning;
pub mod signals;

pub use provisioning::CustomerProvisioner;
pub use signals::{LogOrderCreated, Signals};
