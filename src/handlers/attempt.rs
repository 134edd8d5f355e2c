// src/handlers/attempt.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::attempt::{NavigateRequest, SelectAnswerRequest, SubmitAttemptRequest},
    services::attempts::AttemptService,
    utils::jwt::Claims,
};

/// Starts an attempt at an exam for the authenticated taker.
///
/// The countdown begins immediately.
pub async fn start_attempt(
    State(attempts): State<AttemptService>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = attempts.start(&exam_id, &claims.taker()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Current question, selections and remaining time.
pub async fn get_attempt(
    State(attempts): State<AttemptService>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(attempts.view(id, &claims.taker()).await?))
}

/// Selects an option for a question.
///
/// Unknown questions, out-of-range options and selections on a submitted
/// attempt are ignored; the response always carries the current state.
pub async fn select_answer(
    State(attempts): State<AttemptService>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let view = attempts
        .select_answer(id, &claims.taker(), &payload.question_id, payload.option_index)
        .await?;
    Ok(Json(view))
}

pub async fn navigate(
    State(attempts): State<AttemptService>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NavigateRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(attempts.navigate(id, &claims.taker(), payload).await?))
}

/// Submits the attempt.
///
/// * Depending on the submit policy, unanswered questions may need `confirmed`.
/// * A repeated submit returns the first result unchanged.
/// * The score is placed on the exam's leaderboard.
pub async fn submit_attempt(
    State(attempts): State<AttemptService>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(attempts.submit(id, &claims.taker(), payload.confirmed).await?))
}

/// Per-question review of a submitted attempt.
pub async fn get_report(
    State(attempts): State<AttemptService>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(attempts.report(id, &claims.taker()).await?))
}

/// Leaves the attempt. Its timer stops and the attempt is forgotten.
pub async fn abandon_attempt(
    State(attempts): State<AttemptService>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    attempts.abandon(id, &claims.taker()).await?;
    Ok(StatusCode::NO_CONTENT)
}
