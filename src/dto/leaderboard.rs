use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::{
    dao::models::{ChampionRowEntity, LeaderboardRowEntity, UserEntity},
    dto::{format_system_time, validation::validate_username},
};

/// Display name used when a session was never claimed by a user.
const ANONYMOUS: &str = "anonymous";

/// Payload of the leaderboard sign-up form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Email address; globally unique.
    pub email: String,
    /// Display name; globally unique.
    pub username: String,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.email.as_str().validate_email() {
            let mut err = ValidationError::new("email_format");
            err.message = Some("Enter a valid email address".into());
            errors.add("email", err);
        }

        if let Err(err) = validate_username(&self.username) {
            errors.add("username", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// A registered leaderboard user.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    /// Primary key of the user.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// RFC 3339 registration timestamp.
    pub created_at: String,
}

impl From<UserEntity> for UserSummary {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: format_system_time(user.created_at),
        }
    }
}

/// One leaderboard row.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// Primary key of the completed session.
    pub id: Uuid,
    /// Username of the session owner, or "anonymous".
    pub username: String,
    /// Final score.
    pub score: i64,
    /// Final correct-guess count.
    pub correct_guesses: u32,
    /// Final incorrect-guess count.
    pub incorrect_guesses: u32,
    /// Allotted time in seconds.
    pub time_limit_secs: u32,
    /// Category display name.
    pub category: String,
    /// Team display name.
    pub team: String,
    /// RFC 3339 creation timestamp, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<LeaderboardRowEntity> for LeaderboardEntry {
    fn from(row: LeaderboardRowEntity) -> Self {
        Self {
            id: row.game_id,
            username: row.username.unwrap_or_else(|| ANONYMOUS.into()),
            score: row.score,
            correct_guesses: row.correct_guesses,
            incorrect_guesses: row.incorrect_guesses,
            time_limit_secs: row.time_limit_secs,
            category: row.category_name,
            team: row.team_name,
            created_at: row.created_at.map(format_system_time),
        }
    }
}

/// Completed sessions ordered by descending score.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// At most the configured leaderboard limit of rows.
    pub entries: Vec<LeaderboardEntry>,
}

/// One champions-wall row.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChampionEntry {
    /// Primary key of the champion record.
    pub id: Uuid,
    /// Username of the session owner, or "anonymous".
    pub username: String,
    /// Seconds taken to complete the roster.
    pub time_taken_secs: u32,
    /// Total guesses submitted during the session.
    pub total_guesses: u32,
    /// Category display name.
    pub category: String,
    /// Team display name.
    pub team: String,
    /// RFC 3339 creation timestamp, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<ChampionRowEntity> for ChampionEntry {
    fn from(row: ChampionRowEntity) -> Self {
        Self {
            id: row.id,
            username: row.username.unwrap_or_else(|| ANONYMOUS.into()),
            time_taken_secs: row.time_taken_secs,
            total_guesses: row.total_guesses,
            category: row.category_name,
            team: row.team_name,
            created_at: row.created_at.map(format_system_time),
        }
    }
}

/// Qualifying sessions ordered by ascending completion time.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChampionsResponse {
    /// At most the configured champions limit of rows.
    pub entries: Vec<ChampionEntry>,
}
