use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::session::{GuessRequest, GuessResponse, SessionSnapshot, StartSessionRequest},
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes driving the session lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/guesses", post(submit_guess))
        .route("/sessions/{id}/end", post(end_session))
}

/// Start a new timed session for a category/team pair.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "session",
    request_body = StartSessionRequest,
    responses(
        (status = 200, description = "Session started", body = SessionSnapshot)
    )
)]
pub async fn start_session(
    State(state): State<SharedState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::start_session(&state, payload).await?;
    Ok(Json(snapshot))
}

/// Snapshot one session (masked roster while in progress).
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "session",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Session snapshot", body = SessionSnapshot)
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::snapshot(&state, id).await?;
    Ok(Json(snapshot))
}

/// Submit one guess against the session's roster.
#[utoipa::path(
    post,
    path = "/sessions/{id}/guesses",
    tag = "session",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = GuessRequest,
    responses(
        (status = 200, description = "Guess recorded", body = GuessResponse)
    )
)]
pub async fn submit_guess(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, AppError> {
    let response = session_service::submit_guess(&state, id, payload).await?;
    Ok(Json(response))
}

/// Give up: finalize the session before the clock runs out.
#[utoipa::path(
    post,
    path = "/sessions/{id}/end",
    tag = "session",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Session finalized", body = SessionSnapshot)
    )
)]
pub async fn end_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::end_session(&state, id).await?;
    Ok(Json(snapshot))
}
