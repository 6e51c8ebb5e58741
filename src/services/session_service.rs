//! Session lifecycle orchestration: start, guesses, ticks, give-up, and the
//! one finalization. Every mutation of a session happens under its lock,
//! which is the ordering policy between a guess in flight and the countdown
//! reaching zero.

use std::time::SystemTime;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::{
        models::{
            GameCompletionEntity, GameStatus, NewChampionEntity, NewGameEntity, NewGuessEntity,
        },
        store::RemoteStore,
    },
    dto::{
        session::{
            GuessOutcome, GuessRequest, GuessResponse, RevealedPlayer, SessionSnapshot,
            StartSessionRequest,
        },
        sse::{GuessRecordedEvent, SessionCompletedEvent},
    },
    error::ServiceError,
    services::{countdown, sse_events},
    state::{
        SharedSession, SharedState,
        machine::{FinishReason, SessionEvent},
        session::{ActiveSession, normalize_guess},
    },
};

/// Create the remote session row, load the roster, register the session, and
/// start its countdown.
pub async fn start_session(
    state: &SharedState,
    request: StartSessionRequest,
) -> Result<SessionSnapshot, ServiceError> {
    let store = state.require_store().await?;

    let game = store
        .insert_game(NewGameEntity {
            user_id: request.user_id,
            category_id: request.category_id,
            team_id: request.team_id,
            time_limit_secs: state.config().time_limit_secs,
            started_at: SystemTime::now(),
            status: GameStatus::InProgress,
        })
        .await?;

    let roster = store.team_roster(request.team_id).await?;
    if roster.is_empty() {
        // The remote row already exists; it is never finalized, and the
        // leaderboard only reads completed rows.
        warn!(game_id = %game.id, team_id = %request.team_id, "team has no roster; abandoning session row");
        return Err(ServiceError::NotFound(format!(
            "team `{}` has no roster",
            request.team_id
        )));
    }

    let mut session = ActiveSession::new(&game, roster, state.config().recent_guesses);
    let plan = session.machine.plan(SessionEvent::Start)?;
    session.machine.apply(plan.id)?;

    sse_events::broadcast_session_started(state, &session);
    let snapshot = SessionSnapshot::from(&session);

    let handle = state.insert_session(session);
    countdown::spawn(state.clone(), handle);

    Ok(snapshot)
}

/// Read-only snapshot of one session.
pub async fn snapshot(state: &SharedState, id: Uuid) -> Result<SessionSnapshot, ServiceError> {
    let handle = require_session(state, id)?;
    let session = handle.lock().await;
    Ok(SessionSnapshot::from(&*session))
}

/// Resolve, persist, and commit one guess.
pub async fn submit_guess(
    state: &SharedState,
    id: Uuid,
    request: GuessRequest,
) -> Result<GuessResponse, ServiceError> {
    let normalized = normalize_guess(&request.guess);
    if normalized.is_empty() {
        return Err(ServiceError::InvalidInput("guess must not be empty".into()));
    }

    let store = state.require_store().await?;
    let handle = require_session(state, id)?;
    let mut session = handle.lock().await;

    if session.machine.is_completed() || session.remaining_secs == 0 {
        return Err(ServiceError::InvalidState(
            "session is no longer accepting guesses".into(),
        ));
    }

    let resolution = session.resolve_guess(&normalized);

    // Persist first; local bookkeeping commits only on success so the
    // displayed counts never drift from the stored guess records.
    store
        .insert_guess(NewGuessEntity {
            game_id: session.id,
            player_id: resolution.matched_player(),
            guess: normalized,
            is_correct: resolution.is_correct(),
            submitted_at: SystemTime::now(),
        })
        .await?;

    session.commit_guess(&request.guess, &resolution);

    let outcome = GuessOutcome::from(&resolution);
    sse_events::broadcast_guess_recorded(
        state,
        GuessRecordedEvent {
            session_id: session.id,
            outcome,
            correct_count: session.correct_count,
            incorrect_count: session.incorrect_count,
            score: session.score(),
        },
    );

    let player = resolution.matched_player().and_then(|player_id| {
        session.roster.get(&player_id).map(|player| RevealedPlayer {
            id: player_id,
            name: player.name.clone(),
            rank: player.rank,
            points: player.points,
            tenure: player.tenure.clone(),
        })
    });

    let mut completed = false;
    if session.roster_complete() {
        match finalize_locked(state, store.as_ref(), &mut session, FinishReason::RosterCompleted)
            .await
        {
            Ok(()) => completed = true,
            Err(err) => {
                // The guess itself is committed; the ticker retries the
                // finalization on its next pass.
                warn!(session_id = %session.id, error = %err, "finalization after roster completion failed");
            }
        }
    }

    Ok(GuessResponse {
        outcome,
        player,
        correct_count: session.correct_count,
        incorrect_count: session.incorrect_count,
        score: session.score(),
        remaining_secs: session.remaining_secs,
        completed,
    })
}

/// Manual stop ("give up"). Finalizes immediately.
pub async fn end_session(state: &SharedState, id: Uuid) -> Result<SessionSnapshot, ServiceError> {
    let store = state.require_store().await?;
    let handle = require_session(state, id)?;
    let mut session = handle.lock().await;

    if session.machine.is_completed() {
        return Err(ServiceError::InvalidState(
            "session already completed".into(),
        ));
    }

    let reason = if session.roster_complete() {
        FinishReason::RosterCompleted
    } else {
        FinishReason::GaveUp
    };
    finalize_locked(state, store.as_ref(), &mut session, reason).await?;

    Ok(SessionSnapshot::from(&*session))
}

/// One ticker pass. Returns true when the session reached its terminal phase
/// and the ticker should stop.
pub async fn run_tick(state: &SharedState, handle: &SharedSession) -> bool {
    let mut session = handle.lock().await;
    if session.machine.is_completed() {
        return true;
    }

    // A finalization that failed earlier (roster completed or clock already
    // at zero) is retried before the clock moves again.
    if session.roster_complete() {
        return try_finalize(state, &mut session, FinishReason::RosterCompleted).await;
    }
    if session.remaining_secs == 0 {
        return try_finalize(state, &mut session, FinishReason::TimerExpired).await;
    }

    session.tick();
    sse_events::broadcast_tick(state, &session);

    if session.remaining_secs == 0 {
        return try_finalize(state, &mut session, FinishReason::TimerExpired).await;
    }
    false
}

async fn try_finalize(
    state: &SharedState,
    session: &mut ActiveSession,
    reason: FinishReason,
) -> bool {
    let Some(store) = state.store().await else {
        warn!(session_id = %session.id, "store unavailable; finalization deferred");
        return false;
    };

    match finalize_locked(state, store.as_ref(), session, reason).await {
        Ok(()) => true,
        Err(err) => {
            warn!(session_id = %session.id, error = %err, "finalization failed; retrying next tick");
            false
        }
    }
}

/// Finalize a session exactly once: plan the terminal transition, apply the
/// remote update, then commit the phase. A failed write aborts the plan so a
/// later attempt can retry.
async fn finalize_locked(
    state: &SharedState,
    store: &dyn RemoteStore,
    session: &mut ActiveSession,
    reason: FinishReason,
) -> Result<(), ServiceError> {
    let plan = session.machine.plan(SessionEvent::Finish(reason))?;

    let completion = GameCompletionEntity {
        ended_at: SystemTime::now(),
        score: session.score(),
        correct_guesses: session.correct_count,
        incorrect_guesses: session.incorrect_count,
        status: GameStatus::Completed,
    };

    match store.finalize_game(session.id, completion).await {
        Ok(_) => {
            session.machine.apply(plan.id)?;
        }
        Err(err) => {
            if let Err(abort_err) = session.machine.abort(plan.id) {
                warn!(
                    session_id = %session.id,
                    error = ?abort_err,
                    "failed to abort finalization plan"
                );
            }
            return Err(err.into());
        }
    }

    session.finish_reason = Some(reason);

    if session.roster_complete() {
        let champion = NewChampionEntity {
            user_id: session.user_id,
            category_id: session.category_id,
            team_id: session.team_id,
            time_taken_secs: session.elapsed_secs(),
            total_guesses: session.total_guesses(),
            created_at: SystemTime::now(),
        };
        match store.insert_champion(champion).await {
            Ok(()) => session.champion_recorded = true,
            Err(err) => {
                // The finalization stands; the snapshot reports the miss.
                warn!(session_id = %session.id, error = %err, "failed to record champion");
            }
        }
    }

    sse_events::broadcast_session_completed(
        state,
        SessionCompletedEvent {
            session_id: session.id,
            reason: reason.into(),
            score: session.score(),
            correct_count: session.correct_count,
            incorrect_count: session.incorrect_count,
            champion: session.champion_recorded,
        },
    );

    Ok(())
}

fn require_session(state: &SharedState, id: Uuid) -> Result<SharedSession, ServiceError> {
    state
        .session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{models::PlayerEntity, store::memory::MemoryStore},
        dto::session::SessionPhaseSummary,
        state::AppState,
    };

    fn seeded_store(team_id: Uuid, names: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        let players = names
            .iter()
            .enumerate()
            .map(|(index, name)| PlayerEntity {
                id: Uuid::new_v4(),
                name: (*name).to_string(),
                team_id,
                rank: (index + 1) as u8,
                points: 25_000,
                tenure: "2003-2023".into(),
            })
            .collect();
        store.seed(Vec::new(), Vec::new(), players);
        store
    }

    async fn started_session(
        names: &[&str],
    ) -> (SharedState, MemoryStore, Uuid) {
        let state = AppState::new(AppConfig::default());
        let team_id = Uuid::new_v4();
        let store = seeded_store(team_id, names);
        state.set_store(Arc::new(store.clone())).await;

        let snapshot = start_session(
            &state,
            StartSessionRequest {
                category_id: Uuid::new_v4(),
                team_id,
                user_id: None,
            },
        )
        .await
        .unwrap();

        (state, store, snapshot.id)
    }

    #[tokio::test]
    async fn start_session_masks_the_roster() {
        let (state, store, id) = started_session(&["LeBron James", "Stephen Curry"]).await;

        let game = store.game(id).unwrap();
        assert_eq!(game.status, GameStatus::InProgress);

        let snapshot = snapshot(&state, id).await.unwrap();
        assert_eq!(snapshot.phase, SessionPhaseSummary::InProgress);
        assert_eq!(snapshot.remaining_secs, 60);
        assert!(snapshot.roster.iter().all(|slot| slot.player.is_none()));
        assert!(snapshot.roster.iter().map(|slot| slot.rank).eq(1u8..=2));
    }

    #[tokio::test]
    async fn guess_counts_match_stored_guess_records() {
        let (state, store, id) = started_session(&["LeBron James", "Stephen Curry"]).await;

        for raw in ["james", "nobody", "james", "curry"] {
            submit_guess(
                &state,
                id,
                GuessRequest {
                    guess: raw.to_string(),
                },
            )
            .await
            .unwrap();
        }

        let snapshot = snapshot(&state, id).await.unwrap();
        assert_eq!(
            (snapshot.correct_count + snapshot.incorrect_count) as usize,
            store.guess_count()
        );
        assert_eq!(snapshot.correct_count, 2);
        assert_eq!(snapshot.incorrect_count, 2);
        assert_eq!(snapshot.score, 0);
    }

    #[tokio::test]
    async fn failed_guess_insert_leaves_local_state_untouched() {
        let (state, store, id) = started_session(&["LeBron James", "Stephen Curry"]).await;

        store.fail_next_guess_inserts(1);
        let err = submit_guess(
            &state,
            id,
            GuessRequest {
                guess: "james".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));

        let snapshot = snapshot(&state, id).await.unwrap();
        assert_eq!(snapshot.correct_count, 0);
        assert_eq!(snapshot.incorrect_count, 0);
        assert_eq!(store.guess_count(), 0);
    }

    #[tokio::test]
    async fn empty_guess_is_rejected_before_matching() {
        let (state, store, id) = started_session(&["LeBron James"]).await;

        let err = submit_guess(&state, id, GuessRequest { guess: "   ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(store.guess_count(), 0);
    }

    #[tokio::test]
    async fn completing_the_roster_finalizes_once_and_records_a_champion() {
        let (state, store, id) = started_session(&["LeBron James", "Stephen Curry"]).await;

        submit_guess(
            &state,
            id,
            GuessRequest {
                guess: "james".into(),
            },
        )
        .await
        .unwrap();
        let response = submit_guess(
            &state,
            id,
            GuessRequest {
                guess: "curry".into(),
            },
        )
        .await
        .unwrap();

        assert!(response.completed);
        assert_eq!(store.finalize_calls(), 1);
        assert_eq!(store.champion_count(), 1);

        let game = store.game(id).unwrap();
        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(game.score, 2);
        assert!(game.ended_at.is_some());

        // Terminal phase: no more guesses, no second finalization.
        let err = submit_guess(
            &state,
            id,
            GuessRequest {
                guess: "james".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        let err = end_session(&state, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert_eq!(store.finalize_calls(), 1);
    }

    #[tokio::test]
    async fn completed_snapshot_discloses_the_full_roster() {
        let (state, _store, id) = started_session(&["LeBron James", "Stephen Curry"]).await;

        submit_guess(
            &state,
            id,
            GuessRequest {
                guess: "james".into(),
            },
        )
        .await
        .unwrap();
        let snapshot = end_session(&state, id).await.unwrap();

        assert_eq!(snapshot.phase, SessionPhaseSummary::Completed);
        assert!(snapshot.roster.iter().all(|slot| slot.player.is_some()));
        assert!(
            snapshot
                .roster
                .iter()
                .any(|slot| !slot.guessed && slot.player.is_some())
        );
    }

    #[tokio::test]
    async fn give_up_finalizes_without_a_champion() {
        let (state, store, id) = started_session(&["LeBron James", "Stephen Curry"]).await;

        let snapshot = end_session(&state, id).await.unwrap();
        assert_eq!(snapshot.phase, SessionPhaseSummary::Completed);
        assert!(!snapshot.champion);
        assert_eq!(store.champion_count(), 0);
        assert_eq!(store.finalize_calls(), 1);
    }

    #[tokio::test]
    async fn failed_finalization_aborts_and_can_be_retried() {
        let (state, store, id) = started_session(&["LeBron James", "Stephen Curry"]).await;

        store.fail_next_finalizations(1);
        let err = end_session(&state, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));

        // Phase unchanged; the retry succeeds.
        let snapshot = snapshot(&state, id).await.unwrap();
        assert_eq!(snapshot.phase, SessionPhaseSummary::InProgress);

        let snapshot = end_session(&state, id).await.unwrap();
        assert_eq!(snapshot.phase, SessionPhaseSummary::Completed);
        assert_eq!(store.finalize_calls(), 2);
    }

    #[tokio::test]
    async fn ticker_pass_finalizes_an_expired_session() {
        // Build the session by hand so no live countdown task races the
        // manual `run_tick` calls below.
        let state = AppState::new(AppConfig::default());
        let team_id = Uuid::new_v4();
        let store = seeded_store(team_id, &["LeBron James"]);
        state.set_store(Arc::new(store.clone())).await;

        let game = state
            .require_store()
            .await
            .unwrap()
            .insert_game(NewGameEntity {
                user_id: None,
                category_id: Uuid::new_v4(),
                team_id,
                time_limit_secs: 60,
                started_at: SystemTime::now(),
                status: GameStatus::InProgress,
            })
            .await
            .unwrap();

        let roster = state
            .require_store()
            .await
            .unwrap()
            .team_roster(team_id)
            .await
            .unwrap();
        let mut session = ActiveSession::new(&game, roster, 5);
        let plan = session.machine.plan(SessionEvent::Start).unwrap();
        session.machine.apply(plan.id).unwrap();

        let id = game.id;
        let handle = state.insert_session(session);

        // Drain the clock without waiting a minute of wall time.
        for _ in 0..59 {
            assert!(!run_tick(&state, &handle).await);
        }
        // The 60th pass moves the clock to zero and finalizes.
        assert!(run_tick(&state, &handle).await);
        assert_eq!(store.finalize_calls(), 1);

        let snapshot = snapshot(&state, id).await.unwrap();
        assert_eq!(snapshot.phase, SessionPhaseSummary::Completed);
        assert_eq!(snapshot.remaining_secs, 0);

        // A stopped ticker never finalizes twice.
        assert!(run_tick(&state, &handle).await);
        assert_eq!(store.finalize_calls(), 1);
    }

    #[tokio::test]
    async fn starting_against_an_empty_roster_fails() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryStore::new();
        state.set_store(Arc::new(store)).await;

        let err = start_session(
            &state,
            StartSessionRequest {
                category_id: Uuid::new_v4(),
                team_id: Uuid::new_v4(),
                user_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
