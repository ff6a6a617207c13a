//! User repository for database operations.
//!
//! Users are the minimal identity record behind the access policy: an email,
//! a staff flag, and the opaque api token callers present as a bearer
//! credential.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cartwheel_core::UserId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::User;

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    is_staff: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            is_staff: row.is_staff,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a pre-generated api token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &str,
        is_staff: bool,
        api_token: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (email, is_staff, api_token)
            VALUES ($1, $2, $3)
            RETURNING id, email, is_staff, created_at, updated_at
            ",
        )
        .bind(email)
        .bind(is_staff)
        .bind(api_token)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email already exists"))?;

        Ok(row.into())
    }

    /// Resolve a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(&self, api_token: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, is_staff, created_at, updated_at
            FROM users
            WHERE api_token = $1
            ",
        )
        .bind(api_token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
