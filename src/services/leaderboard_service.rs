//! Leaderboard and champions-wall projections, plus the sign-up flow gating
//! access to the leaderboard view.

use std::time::SystemTime;

use validator::Validate;

use crate::{
    dao::models::NewUserEntity,
    dto::leaderboard::{ChampionsResponse, LeaderboardResponse, SignupRequest, UserSummary},
    error::ServiceError,
    state::SharedState,
};

/// Completed sessions ordered by descending score, at most the configured
/// limit.
pub async fn leaderboard(state: &SharedState) -> Result<LeaderboardResponse, ServiceError> {
    let store = state.require_store().await?;
    let rows = store.leaderboard(state.config().leaderboard_limit).await?;
    Ok(LeaderboardResponse {
        entries: rows.into_iter().map(Into::into).collect(),
    })
}

/// Qualifying sessions ordered by ascending completion time, at most the
/// configured limit.
pub async fn champions(state: &SharedState) -> Result<ChampionsResponse, ServiceError> {
    let store = state.require_store().await?;
    let rows = store.champions(state.config().champions_limit).await?;
    Ok(ChampionsResponse {
        entries: rows.into_iter().map(Into::into).collect(),
    })
}

/// Register a leaderboard user. Email and username must both be unused; the
/// store's unique constraints are the final arbiter for races between
/// concurrent sign-ups.
pub async fn sign_up(
    state: &SharedState,
    request: SignupRequest,
) -> Result<UserSummary, ServiceError> {
    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(format!("validation failed: {err}")))?;

    let store = state.require_store().await?;

    if store
        .find_user_by_email(request.email.clone())
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict("email already registered".into()));
    }

    if store
        .find_user_by_username(request.username.clone())
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict("username already taken".into()));
    }

    let user = store
        .insert_user(NewUserEntity {
            email: request.email,
            username: request.username,
            created_at: SystemTime::now(),
        })
        .await?;

    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{GameCompletionEntity, GameStatus, NewChampionEntity, NewGameEntity},
            store::{RemoteStore, memory::MemoryStore},
        },
        state::AppState,
    };

    async fn state_with_store() -> (crate::state::SharedState, MemoryStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemoryStore::new();
        state.set_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn signup(email: &str, username: &str) -> SignupRequest {
        SignupRequest {
            email: email.into(),
            username: username.into(),
        }
    }

    #[tokio::test]
    async fn sign_up_then_duplicate_email_is_rejected() {
        let (state, store) = state_with_store().await;

        let user = sign_up(&state, signup("fan@example.com", "hoops_fan"))
            .await
            .unwrap();
        assert_eq!(user.username, "hoops_fan");
        assert_eq!(store.user_count(), 1);

        let err = sign_up(&state, signup("fan@example.com", "other_name"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (state, store) = state_with_store().await;

        sign_up(&state, signup("fan@example.com", "hoops_fan"))
            .await
            .unwrap();
        let err = sign_up(&state, signup("other@example.com", "hoops_fan"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn malformed_signup_is_rejected_before_any_lookup() {
        let (state, store) = state_with_store().await;

        let err = sign_up(&state, signup("not-an-email", "hoops_fan"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = sign_up(&state, signup("fan@example.com", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn leaderboard_is_capped_and_ordered_by_descending_score() {
        let (state, store) = state_with_store().await;

        for score in 0..60 {
            let game = store
                .insert_game(NewGameEntity {
                    user_id: None,
                    category_id: Uuid::new_v4(),
                    team_id: Uuid::new_v4(),
                    time_limit_secs: 60,
                    started_at: std::time::SystemTime::now(),
                    status: GameStatus::InProgress,
                })
                .await
                .unwrap();
            store
                .finalize_game(
                    game.id,
                    GameCompletionEntity {
                        ended_at: std::time::SystemTime::now(),
                        score,
                        correct_guesses: score.max(0) as u32,
                        incorrect_guesses: 0,
                        status: GameStatus::Completed,
                    },
                )
                .await
                .unwrap();
        }

        let response = leaderboard(&state).await.unwrap();
        assert_eq!(response.entries.len(), 50);
        assert!(
            response
                .entries
                .windows(2)
                .all(|pair| pair[0].score >= pair[1].score)
        );
        assert_eq!(response.entries.first().unwrap().score, 59);
        assert_eq!(response.entries.first().unwrap().username, "anonymous");
    }

    #[tokio::test]
    async fn champions_wall_is_capped_and_ordered_by_ascending_time() {
        let (state, store) = state_with_store().await;

        for time_taken in (0..15).rev() {
            store
                .insert_champion(NewChampionEntity {
                    user_id: None,
                    category_id: Uuid::new_v4(),
                    team_id: Uuid::new_v4(),
                    time_taken_secs: 10 + time_taken,
                    total_guesses: 12,
                    created_at: std::time::SystemTime::now(),
                })
                .await
                .unwrap();
        }

        let response = champions(&state).await.unwrap();
        assert_eq!(response.entries.len(), 10);
        assert!(
            response
                .entries
                .windows(2)
                .all(|pair| pair[0].time_taken_secs <= pair[1].time_taken_secs)
        );
        assert_eq!(response.entries.first().unwrap().time_taken_secs, 10);
    }
}
