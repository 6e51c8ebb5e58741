/// Category and team browsing.
pub mod catalog_service;
/// Per-session countdown ticker tasks.
pub mod countdown;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Leaderboard, champions wall, and sign-up.
pub mod leaderboard_service;
/// Session lifecycle: start, guesses, finalization.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Store connection supervisor with reconnect backoff.
pub mod storage_supervisor;
