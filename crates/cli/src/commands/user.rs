//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a regular user
//! cartwheel-cli user create -e customer@example.com
//!
//! # Create a staff user
//! cartwheel-cli user create -e admin@example.com --staff
//! ```
//!
//! # Environment Variables
//!
//! - `CARTWHEEL_DATABASE_URL` - `PostgreSQL` connection string

use rand::{Rng, distr::Alphanumeric};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use super::migrate::database_url;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),
}

impl From<super::migrate::MigrationError> for UserError {
    fn from(err: super::migrate::MigrationError) -> Self {
        match err {
            super::migrate::MigrationError::MissingEnvVar(name) => Self::MissingEnvVar(name),
            super::migrate::MigrationError::Database(e) => Self::Database(e),
            super::migrate::MigrationError::Migration(e) => Self::Database(e.into()),
        }
    }
}

/// Create a new user and print its api token.
///
/// # Errors
///
/// Returns an error if the email is invalid, the user already exists, or a
/// query fails.
pub async fn create(email: &str, staff: bool) -> Result<i32, UserError> {
    // Basic email validation
    if !email.contains('@') || !email.contains('.') {
        return Err(UserError::InvalidEmail(email.to_owned()));
    }

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(UserError::UserExists(email.to_owned()));
    }

    let api_token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(40)
        .map(char::from)
        .collect();

    let user_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO users (email, is_staff, api_token)
        VALUES ($1, $2, $3)
        RETURNING id
        ",
    )
    .bind(email)
    .bind(staff)
    .bind(&api_token)
    .fetch_one(&pool)
    .await?;

    // Provision the customer profile the same way the API's signal listener
    // does, so CLI-created users can place orders immediately.
    sqlx::query(
        r"
        INSERT INTO customers (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        ",
    )
    .bind(user_id)
    .execute(&pool)
    .await?;

    tracing::info!("User created! ID: {}, Email: {}, Staff: {}", user_id, email, staff);

    #[allow(clippy::print_stdout)]
    {
        println!("api_token: {api_token}");
    }

    Ok(user_id)
}
