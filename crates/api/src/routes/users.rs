//! Identity creation.
//!
//! The only identity endpoint: create a user and hand back its api token.
//! The customer profile is provisioned by the `user_created` listener after
//! the row commits, never inline.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use cartwheel_core::UserId;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::generate_api_token;
use crate::state::AppState;

/// Payload for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    #[serde(default)]
    pub staff: bool,
}

/// Response for a freshly created user. The api token is only ever revealed
/// here.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: UserId,
    pub email: String,
    pub is_staff: bool,
    pub api_token: String,
}

/// `POST /auth/users`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<CreatedUser>)> {
    let email = input.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("email is not valid".to_owned()));
    }

    let api_token = generate_api_token();
    let user = UserRepository::new(state.pool())
        .create(email, input.staff, &api_token)
        .await?;

    state.signals().emit_user_created(&user).await;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUser {
            id: user.id,
            email: user.email,
            is_staff: user.is_staff,
            api_token,
        }),
    ))
}
