// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::taker::{Taker, TokenRequest, TokenResponse},
    utils::{html::clean_display_name, jwt::sign_jwt},
};

/// Issues a taker token for a display name.
///
/// The name is stripped of markup first; the cleaned form is what ends up in
/// the token and on leaderboards. Each call mints a fresh taker id, so asking
/// again for a name already in use does not grant access to its attempts.
pub async fn issue_token(
    State(config): State<Config>,
    Json(payload): Json<TokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let name = clean_display_name(&payload.name)
        .ok_or(AppError::BadRequest("Name must contain visible text".to_string()))?;

    let taker = Taker::new(name);
    let token = sign_jwt(&taker, &config.jwt_secret, config.jwt_expiration)?;
    tracing::debug!(taker_id = %taker.id, name = %taker.name, "Issued taker token");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            taker_id: taker.id,
            name: taker.name,
            expires_in: config.jwt_expiration,
        }),
    ))
}
