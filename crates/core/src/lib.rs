//! Cartwheel Core - Shared types library.
//!
//! Common types for the Cartwheel backend: type-safe IDs, status enums, and
//! the access policy consulted by the API's route handlers.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and status enums
//! - [`policy`] - The access policy: (role, resource, operation) -> allow/deny

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod policy;
pub mod types;

pub use policy::{Operation, Resource, Role, is_allowed};
pub use types::*;
