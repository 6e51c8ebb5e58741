use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::format_system_time,
    state::{
        machine::{FinishReason, SessionPhase},
        session::{ActiveSession, GuessResolution, RecentGuess},
    },
};

/// Payload used to start a new session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartSessionRequest {
    /// Category picked from the dropdown.
    pub category_id: Uuid,
    /// Team picked from the dropdown.
    pub team_id: Uuid,
    /// Leaderboard user claiming the session, when signed up.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Payload carrying one guess.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GuessRequest {
    /// Raw guess text; trimmed and lowercased before matching.
    pub guess: String,
}

/// Session lifecycle phase exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhaseSummary {
    /// Session exists but play has not begun.
    Pending,
    /// Countdown running, guesses accepted.
    InProgress,
    /// Finalized; terminal.
    Completed,
}

impl From<SessionPhase> for SessionPhaseSummary {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Pending => SessionPhaseSummary::Pending,
            SessionPhase::InProgress => SessionPhaseSummary::InProgress,
            SessionPhase::Completed => SessionPhaseSummary::Completed,
        }
    }
}

/// Why a session finished, exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReasonSummary {
    /// The countdown reached zero.
    TimerExpired,
    /// Every roster player was guessed in time.
    RosterCompleted,
    /// The player gave up.
    GaveUp,
}

impl From<FinishReason> for FinishReasonSummary {
    fn from(reason: FinishReason) -> Self {
        match reason {
            FinishReason::TimerExpired => FinishReasonSummary::TimerExpired,
            FinishReason::RosterCompleted => FinishReasonSummary::RosterCompleted,
            FinishReason::GaveUp => FinishReasonSummary::GaveUp,
        }
    }
}

/// Outcome of one submitted guess.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GuessOutcome {
    /// Matched an unguessed roster player.
    Correct,
    /// Matched a player already guessed; counted incorrect.
    AlreadyGuessed,
    /// Suffix matched more than one roster name; counted incorrect.
    Ambiguous,
    /// Matched nobody.
    Incorrect,
}

impl From<&GuessResolution> for GuessOutcome {
    fn from(resolution: &GuessResolution) -> Self {
        match resolution {
            GuessResolution::Correct { .. } => GuessOutcome::Correct,
            GuessResolution::AlreadyGuessed { .. } => GuessOutcome::AlreadyGuessed,
            GuessResolution::Ambiguous { .. } => GuessOutcome::Ambiguous,
            GuessResolution::Miss => GuessOutcome::Incorrect,
        }
    }
}

/// Roster player details disclosed once guessed (or once the session ends).
#[derive(Debug, Serialize, ToSchema)]
pub struct RevealedPlayer {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Full player name.
    pub name: String,
    /// Rank position inside the roster.
    pub rank: u8,
    /// Career point total.
    pub points: i64,
    /// Tenure descriptor.
    pub tenure: String,
}

/// One roster slot as shown on the board. Unguessed slots stay masked while
/// the session is in progress; a completed session discloses everything so
/// the client can reveal locally.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterSlot {
    /// Rank position inside the roster.
    pub rank: u8,
    /// Whether the slot was guessed correctly.
    pub guessed: bool,
    /// Disclosed player details, when visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<RevealedPlayer>,
}

/// One recent-guess feed entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecentGuessSummary {
    /// Trimmed guess text as submitted.
    pub guess: String,
    /// Whether it was counted correct.
    pub correct: bool,
    /// Matched player name, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

impl From<&RecentGuess> for RecentGuessSummary {
    fn from(entry: &RecentGuess) -> Self {
        Self {
            guess: entry.guess.clone(),
            correct: entry.correct,
            player_name: entry.player_name.clone(),
        }
    }
}

/// Full snapshot of one session as exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSnapshot {
    /// Primary key of the session.
    pub id: Uuid,
    /// Category picked for the session.
    pub category_id: Uuid,
    /// Team whose roster is being guessed.
    pub team_id: Uuid,
    /// Lifecycle phase.
    pub phase: SessionPhaseSummary,
    /// Allotted time in seconds.
    pub time_limit_secs: u32,
    /// Seconds left on the clock.
    pub remaining_secs: u32,
    /// RFC 3339 start timestamp.
    pub started_at: String,
    /// Running score.
    pub score: i64,
    /// Correct guesses so far.
    pub correct_count: u32,
    /// Incorrect guesses so far.
    pub incorrect_count: u32,
    /// Why the session finished, once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReasonSummary>,
    /// Whether the session was recorded on the champions wall.
    pub champion: bool,
    /// The board, one slot per roster player in rank order.
    pub roster: Vec<RosterSlot>,
    /// Recent guesses, newest first.
    pub recent_guesses: Vec<RecentGuessSummary>,
}

impl From<&ActiveSession> for SessionSnapshot {
    fn from(session: &ActiveSession) -> Self {
        let completed = session.machine.is_completed();

        let roster = session
            .roster
            .iter()
            .map(|(id, player)| {
                let guessed = session.guessed.contains(id);
                let revealed = (guessed || completed).then(|| RevealedPlayer {
                    id: *id,
                    name: player.name.clone(),
                    rank: player.rank,
                    points: player.points,
                    tenure: player.tenure.clone(),
                });
                RosterSlot {
                    rank: player.rank,
                    guessed,
                    player: revealed,
                }
            })
            .collect();

        Self {
            id: session.id,
            category_id: session.category_id,
            team_id: session.team_id,
            phase: session.phase().into(),
            time_limit_secs: session.time_limit_secs,
            remaining_secs: session.remaining_secs,
            started_at: format_system_time(session.started_at),
            score: session.score(),
            correct_count: session.correct_count,
            incorrect_count: session.incorrect_count,
            finish_reason: session.finish_reason.map(Into::into),
            champion: session.champion_recorded,
            roster,
            recent_guesses: session.recent.iter().map(Into::into).collect(),
        }
    }
}

/// Response to one submitted guess.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuessResponse {
    /// How the guess resolved.
    pub outcome: GuessOutcome,
    /// The matched player, disclosed on correct guesses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<RevealedPlayer>,
    /// Correct guesses so far.
    pub correct_count: u32,
    /// Incorrect guesses so far.
    pub incorrect_count: u32,
    /// Running score.
    pub score: i64,
    /// Seconds left on the clock.
    pub remaining_secs: u32,
    /// Whether the guess completed the roster and finalized the session.
    pub completed: bool,
}
