// src/handlers/exam.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    config::LEADERBOARD_DEFAULT_LIMIT, error::AppError, models::exam_record::LeaderboardParams,
    services::attempts::AttemptService,
};

/// Lists the exams available in the catalog.
pub async fn list_exams(State(attempts): State<AttemptService>) -> impl IntoResponse {
    Json(attempts.list_exams().await)
}

/// Retrieves one exam with its questions, answer key stripped.
pub async fn get_exam(
    State(attempts): State<AttemptService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(attempts.exam(&id).await?))
}

/// Retrieves the ranked leaderboard of an exam.
pub async fn get_leaderboard(
    State(attempts): State<AttemptService>,
    Path(id): Path<String>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(LEADERBOARD_DEFAULT_LIMIT);
    Ok(Json(attempts.leaderboard(&id, limit).await?))
}
