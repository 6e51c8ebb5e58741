use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::session::{FinishReasonSummary, GuessOutcome};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Build a plain-text event.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a new session begins.
pub struct SessionStartedEvent {
    /// Identifier of the new session.
    pub session_id: Uuid,
    /// Category picked for the session.
    pub category_id: Uuid,
    /// Team whose roster is being guessed.
    pub team_id: Uuid,
    /// Allotted time in seconds.
    pub time_limit_secs: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast every second while a session's countdown runs.
pub struct TickEvent {
    /// Session the tick belongs to.
    pub session_id: Uuid,
    /// Seconds left on the clock.
    pub remaining_secs: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after every recorded guess.
pub struct GuessRecordedEvent {
    /// Session the guess belongs to.
    pub session_id: Uuid,
    /// How the guess resolved.
    pub outcome: GuessOutcome,
    /// Correct guesses so far.
    pub correct_count: u32,
    /// Incorrect guesses so far.
    pub incorrect_count: u32,
    /// Running score.
    pub score: i64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast exactly once when a session is finalized.
pub struct SessionCompletedEvent {
    /// Session that finished.
    pub session_id: Uuid,
    /// Why it finished.
    pub reason: FinishReasonSummary,
    /// Final score.
    pub score: i64,
    /// Final correct-guess count.
    pub correct_count: u32,
    /// Final incorrect-guess count.
    pub incorrect_count: u32,
    /// Whether the session was recorded on the champions wall.
    pub champion: bool,
}
