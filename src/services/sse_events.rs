//! Typed constructors for the events broadcast on the public SSE stream.

use serde::Serialize;
use tracing::warn;

use crate::{
    dto::sse::{
        GuessRecordedEvent, ServerEvent, SessionCompletedEvent, SessionStartedEvent, TickEvent,
    },
    state::{SharedState, session::ActiveSession},
};

const EVENT_SESSION_STARTED: &str = "session.started";
const EVENT_TICK: &str = "session.tick";
const EVENT_GUESS_RECORDED: &str = "session.guess";
const EVENT_SESSION_COMPLETED: &str = "session.completed";

/// Broadcast that a new session began.
pub fn broadcast_session_started(state: &SharedState, session: &ActiveSession) {
    let payload = SessionStartedEvent {
        session_id: session.id,
        category_id: session.category_id,
        team_id: session.team_id,
        time_limit_secs: session.time_limit_secs,
    };
    send_event(state, EVENT_SESSION_STARTED, &payload);
}

/// Broadcast one countdown tick.
pub fn broadcast_tick(state: &SharedState, session: &ActiveSession) {
    let payload = TickEvent {
        session_id: session.id,
        remaining_secs: session.remaining_secs,
    };
    send_event(state, EVENT_TICK, &payload);
}

/// Broadcast that a guess was recorded, with the updated counters.
pub fn broadcast_guess_recorded(state: &SharedState, payload: GuessRecordedEvent) {
    send_event(state, EVENT_GUESS_RECORDED, &payload);
}

/// Broadcast the one finalization of a session.
pub fn broadcast_session_completed(state: &SharedState, payload: SessionCompletedEvent) {
    send_event(state, EVENT_SESSION_COMPLETED, &payload);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
