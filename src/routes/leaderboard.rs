use axum::{Json, Router, extract::State, routing::{get, post}};

use crate::{
    dto::leaderboard::{ChampionsResponse, LeaderboardResponse, SignupRequest, UserSummary},
    error::AppError,
    services::leaderboard_service,
    state::SharedState,
};

/// Routes for the leaderboard, the champions wall, and sign-up.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/leaderboard", get(leaderboard))
        .route("/champions", get(champions))
        .route("/users", post(sign_up))
}

/// Completed sessions by descending score.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Leaderboard entries", body = LeaderboardResponse)
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let response = leaderboard_service::leaderboard(&state).await?;
    Ok(Json(response))
}

/// Qualifying sessions by ascending completion time.
#[utoipa::path(
    get,
    path = "/champions",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Champions wall entries", body = ChampionsResponse)
    )
)]
pub async fn champions(
    State(state): State<SharedState>,
) -> Result<Json<ChampionsResponse>, AppError> {
    let response = leaderboard_service::champions(&state).await?;
    Ok(Json(response))
}

/// Register for the leaderboard; email and username must be unused.
#[utoipa::path(
    post,
    path = "/users",
    tag = "leaderboard",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User registered", body = UserSummary),
        (status = 409, description = "Email or username already taken")
    )
)]
pub async fn sign_up(
    State(state): State<SharedState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<UserSummary>, AppError> {
    let user = leaderboard_service::sign_up(&state, payload).await?;
    Ok(Json(user))
}
