//! Customer repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;

use cartwheel_core::{CustomerId, Membership, UserId};

use super::RepositoryError;
use crate::models::{Customer, CustomerInput};

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    user_id: i32,
    phone: String,
    birth_date: Option<NaiveDate>,
    membership: Membership,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId::new(row.id),
            user_id: UserId::new(row.user_id),
            phone: row.phone,
            birth_date: row.birth_date,
            membership: row.membership,
        }
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Provision the customer profile for a freshly created user.
    ///
    /// Idempotent with respect to the identity lifecycle: re-running for the
    /// same user is a no-op, so a second customer can never be created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn provision(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO customers (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List customers, newest profile first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, user_id, phone, birth_date, membership
            FROM customers
            ORDER BY id
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Total number of customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, user_id, phone, birth_date, membership
            FROM customers
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the customer attached to a user (the `/customers/me` shortcut).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, user_id, phone, birth_date, membership
            FROM customers
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Replace a customer's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customers
            SET phone = $2, birth_date = $3, membership = $4
            WHERE id = $1
            RETURNING id, user_id, phone, birth_date, membership
            ",
        )
        .bind(id)
        .bind(&input.phone)
        .bind(input.birth_date)
        .bind(input.membership)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Replace the calling user's own customer profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no profile exists for the user,
    /// which is a provisioning invariant violation rather than a user error.
    pub async fn update_by_user(
        &self,
        user_id: UserId,
        input: &CustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customers
            SET phone = $2, birth_date = $3, membership = $4
            WHERE user_id = $1
            RETURNING id, user_id, phone, birth_date, membership
            ",
        )
        .bind(user_id)
        .bind(&input.phone)
        .bind(input.birth_date)
        .bind(input.membership)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
