use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Lifecycle status of a game session as persisted remotely.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Session row exists but play has not begun.
    Pending,
    /// Countdown is running and guesses are accepted.
    InProgress,
    /// Session has been finalized; terminal.
    Completed,
}

/// A trivia category grouping several teams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryEntity {
    /// Stable identifier for the category.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Short blurb shown on the category picker.
    pub description: String,
}

/// A team owning a fixed top-ten roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Category the team belongs to.
    pub category_id: Uuid,
}

/// One roster entry. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Full player name, matched against guesses.
    pub name: String,
    /// Team the player is ranked under.
    pub team_id: Uuid,
    /// Rank position inside the roster (1 is the top spot).
    pub rank: u8,
    /// Career point total shown once the player is revealed.
    pub points: i64,
    /// Tenure descriptor, e.g. "2003-2023".
    pub tenure: String,
}

/// Fields required to create a game session row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGameEntity {
    /// Optional leaderboard user the session belongs to.
    pub user_id: Option<Uuid>,
    /// Category picked for the session.
    pub category_id: Uuid,
    /// Team whose roster is being guessed.
    pub team_id: Uuid,
    /// Allotted time in seconds.
    pub time_limit_secs: u32,
    /// When the countdown started.
    pub started_at: SystemTime,
    /// Initial status (in progress as soon as the row exists).
    pub status: GameStatus,
}

/// A game session row as stored remotely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the session.
    pub id: Uuid,
    /// Optional leaderboard user the session belongs to.
    pub user_id: Option<Uuid>,
    /// Category picked for the session.
    pub category_id: Uuid,
    /// Team whose roster is being guessed.
    pub team_id: Uuid,
    /// Allotted time in seconds.
    pub time_limit_secs: u32,
    /// When the countdown started.
    pub started_at: SystemTime,
    /// When the session was finalized, if it has been.
    pub ended_at: Option<SystemTime>,
    /// Running score (correct minus incorrect).
    pub score: i64,
    /// Correct guesses recorded so far.
    pub correct_guesses: u32,
    /// Incorrect guesses recorded so far.
    pub incorrect_guesses: u32,
    /// Lifecycle status.
    pub status: GameStatus,
}

/// The one-shot update applied when a session is finalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameCompletionEntity {
    /// Finalization timestamp.
    pub ended_at: SystemTime,
    /// Final score.
    pub score: i64,
    /// Final correct-guess count.
    pub correct_guesses: u32,
    /// Final incorrect-guess count.
    pub incorrect_guesses: u32,
    /// Terminal status (always completed).
    pub status: GameStatus,
}

/// One appended guess record. Append-only; one row per submitted guess.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGuessEntity {
    /// Session the guess belongs to.
    pub game_id: Uuid,
    /// Matched roster player, when the guess resolved to one.
    pub player_id: Option<Uuid>,
    /// Normalized guess text as submitted.
    pub guess: String,
    /// Whether the guess was counted correct.
    pub is_correct: bool,
    /// When the guess was submitted.
    pub submitted_at: SystemTime,
}

/// Fields required to register a leaderboard user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUserEntity {
    /// Globally unique email address.
    pub email: String,
    /// Globally unique display name.
    pub username: String,
    /// Registration timestamp.
    pub created_at: SystemTime,
}

/// A registered leaderboard user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Primary key of the user.
    pub id: Uuid,
    /// Globally unique email address.
    pub email: String,
    /// Globally unique display name.
    pub username: String,
    /// Registration timestamp.
    pub created_at: SystemTime,
}

/// One leaderboard row: a completed session with its display names resolved
/// through single-level foreign-key expansion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardRowEntity {
    /// Primary key of the session.
    pub game_id: Uuid,
    /// Username of the owning user, when the session was claimed.
    pub username: Option<String>,
    /// Final score.
    pub score: i64,
    /// Final correct-guess count.
    pub correct_guesses: u32,
    /// Final incorrect-guess count.
    pub incorrect_guesses: u32,
    /// Allotted time in seconds.
    pub time_limit_secs: u32,
    /// Category display name.
    pub category_name: String,
    /// Team display name.
    pub team_name: String,
    /// When the session row was created.
    pub created_at: Option<SystemTime>,
}

/// Fields required to record a qualifying session on the champions wall.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewChampionEntity {
    /// Owning user, when the session was claimed.
    pub user_id: Option<Uuid>,
    /// Category of the qualifying session.
    pub category_id: Uuid,
    /// Team of the qualifying session.
    pub team_id: Uuid,
    /// Seconds elapsed between start and the final correct guess.
    pub time_taken_secs: u32,
    /// Total guesses submitted during the session.
    pub total_guesses: u32,
    /// Recording timestamp.
    pub created_at: SystemTime,
}

/// One champions-wall row with display names resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChampionRowEntity {
    /// Primary key of the champion record.
    pub id: Uuid,
    /// Username of the owning user, when claimed.
    pub username: Option<String>,
    /// Seconds taken to complete the roster.
    pub time_taken_secs: u32,
    /// Total guesses submitted during the session.
    pub total_guesses: u32,
    /// Category display name.
    pub category_name: String,
    /// Team display name.
    pub team_name: String,
    /// When the record was created.
    pub created_at: Option<SystemTime>,
}
