//! Request middleware and extractors.

pub mod auth;

pub use auth::{CurrentUser, OptionalUser, authorize, generate_api_token};
