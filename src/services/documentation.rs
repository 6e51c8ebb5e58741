use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the toplist backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::catalog::list_categories,
        crate::routes::catalog::list_teams,
        crate::routes::session::start_session,
        crate::routes::session::get_session,
        crate::routes::session::submit_guess,
        crate::routes::session::end_session,
        crate::routes::leaderboard::leaderboard,
        crate::routes::leaderboard::champions,
        crate::routes::leaderboard::sign_up,
        crate::routes::sse::public_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::catalog::CategoriesResponse,
            crate::dto::catalog::TeamsResponse,
            crate::dto::session::StartSessionRequest,
            crate::dto::session::GuessRequest,
            crate::dto::session::GuessResponse,
            crate::dto::session::SessionSnapshot,
            crate::dto::leaderboard::SignupRequest,
            crate::dto::leaderboard::UserSummary,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::leaderboard::ChampionsResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Category and team browsing"),
        (name = "session", description = "Session lifecycle and guessing"),
        (name = "leaderboard", description = "Leaderboard, champions wall, and sign-up"),
        (name = "sse", description = "Server-sent events stream"),
    )
)]
pub struct ApiDoc;
