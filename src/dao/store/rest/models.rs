//! Wire representations of the store's table rows. Column names follow the
//! remote schema (all-lowercase, unseparated); conversions to the neutral
//! entities of [`crate::dao::models`] happen here, including RFC 3339
//! timestamp handling.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use super::error::RestStoreError;
use crate::dao::models::{
    CategoryEntity, ChampionRowEntity, GameCompletionEntity, GameEntity, GameStatus,
    LeaderboardRowEntity, NewChampionEntity, NewGameEntity, NewGuessEntity, NewUserEntity,
    PlayerEntity, TeamEntity, UserEntity,
};

/// Select list used for leaderboard reads, expanding the user, category, and
/// team foreign keys one level.
pub const LEADERBOARD_SELECT: &str = "id,score,correctguesses,incorrectguesses,timelimit,\
    created_at,users:userid(username),categories:categoryid(name),teams:teamid(name)";

/// Select list used for champions-wall reads.
pub const CHAMPION_SELECT: &str = "id,timetaken,totalguesses,created_at,\
    users:userid(username),categories:categoryid(name),teams:teamid(name)";

/// Fallback display name when an expanded foreign key came back empty.
const UNKNOWN_NAME: &str = "unknown";

pub fn to_rfc3339(timestamp: SystemTime) -> String {
    OffsetDateTime::from(timestamp)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

pub fn parse_rfc3339(value: &str, column: &'static str) -> Result<SystemTime, RestStoreError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map(SystemTime::from)
        .map_err(|source| RestStoreError::InvalidTimestamp { column, source })
}

fn parse_optional(
    value: Option<&str>,
    column: &'static str,
) -> Result<Option<SystemTime>, RestStoreError> {
    value.map(|raw| parse_rfc3339(raw, column)).transpose()
}

#[derive(Debug, Deserialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CategoryRow> for CategoryEntity {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub categoryid: Uuid,
}

impl From<TeamRow> for TeamEntity {
    fn from(row: TeamRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category_id: row.categoryid,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerRow {
    pub id: Uuid,
    pub name: String,
    pub teamid: Uuid,
    pub position: u8,
    pub points: i64,
    pub yearsplayed: String,
}

impl From<PlayerRow> for PlayerEntity {
    fn from(row: PlayerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            team_id: row.teamid,
            rank: row.position,
            points: row.points,
            tenure: row.yearsplayed,
        }
    }
}

/// Insert payload for a fresh `games` row; the store assigns the id.
#[derive(Debug, Serialize)]
pub struct GameInsertRow {
    pub userid: Option<Uuid>,
    pub categoryid: Uuid,
    pub teamid: Uuid,
    pub timelimit: u32,
    pub starttime: String,
    pub status: GameStatus,
    pub score: i64,
    pub correctguesses: u32,
    pub incorrectguesses: u32,
}

impl From<NewGameEntity> for GameInsertRow {
    fn from(game: NewGameEntity) -> Self {
        Self {
            userid: game.user_id,
            categoryid: game.category_id,
            teamid: game.team_id,
            timelimit: game.time_limit_secs,
            starttime: to_rfc3339(game.started_at),
            status: game.status,
            score: 0,
            correctguesses: 0,
            incorrectguesses: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GameRow {
    pub id: Uuid,
    #[serde(default)]
    pub userid: Option<Uuid>,
    pub categoryid: Uuid,
    pub teamid: Uuid,
    pub timelimit: u32,
    pub starttime: String,
    #[serde(default)]
    pub endtime: Option<String>,
    pub score: i64,
    pub correctguesses: u32,
    pub incorrectguesses: u32,
    pub status: GameStatus,
}

impl GameRow {
    pub fn try_into_entity(self) -> Result<GameEntity, RestStoreError> {
        Ok(GameEntity {
            id: self.id,
            user_id: self.userid,
            category_id: self.categoryid,
            team_id: self.teamid,
            time_limit_secs: self.timelimit,
            started_at: parse_rfc3339(&self.starttime, "starttime")?,
            ended_at: parse_optional(self.endtime.as_deref(), "endtime")?,
            score: self.score,
            correct_guesses: self.correctguesses,
            incorrect_guesses: self.incorrectguesses,
            status: self.status,
        })
    }
}

/// Patch payload applied exactly once when a session is finalized.
#[derive(Debug, Serialize)]
pub struct GameCompletionRow {
    pub endtime: String,
    pub status: GameStatus,
    pub score: i64,
    pub correctguesses: u32,
    pub incorrectguesses: u32,
}

impl From<GameCompletionEntity> for GameCompletionRow {
    fn from(completion: GameCompletionEntity) -> Self {
        Self {
            endtime: to_rfc3339(completion.ended_at),
            status: completion.status,
            score: completion.score,
            correctguesses: completion.correct_guesses,
            incorrectguesses: completion.incorrect_guesses,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GuessInsertRow {
    pub gameid: Uuid,
    pub playerid: Option<Uuid>,
    pub guess: String,
    pub iscorrect: bool,
    pub timestamp: String,
}

impl From<NewGuessEntity> for GuessInsertRow {
    fn from(guess: NewGuessEntity) -> Self {
        Self {
            gameid: guess.game_id,
            playerid: guess.player_id,
            guess: guess.guess,
            iscorrect: guess.is_correct,
            timestamp: to_rfc3339(guess.submitted_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserInsertRow {
    pub email: String,
    pub username: String,
    pub created_at: String,
}

impl From<NewUserEntity> for UserInsertRow {
    fn from(user: NewUserEntity) -> Self {
        Self {
            email: user.email,
            username: user.username,
            created_at: to_rfc3339(user.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: String,
}

impl UserRow {
    pub fn try_into_entity(self) -> Result<UserEntity, RestStoreError> {
        Ok(UserEntity {
            id: self.id,
            email: self.email,
            username: self.username,
            created_at: parse_rfc3339(&self.created_at, "created_at")?,
        })
    }
}

/// Expanded to-one foreign key carrying only a display name.
#[derive(Debug, Deserialize)]
pub struct NameRef {
    pub name: String,
}

/// Expanded to-one foreign key carrying only a username.
#[derive(Debug, Deserialize)]
pub struct UsernameRef {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardRow {
    pub id: Uuid,
    pub score: i64,
    pub correctguesses: u32,
    pub incorrectguesses: u32,
    pub timelimit: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub users: Option<UsernameRef>,
    #[serde(default)]
    pub categories: Option<NameRef>,
    #[serde(default)]
    pub teams: Option<NameRef>,
}

impl LeaderboardRow {
    pub fn try_into_entity(self) -> Result<LeaderboardRowEntity, RestStoreError> {
        Ok(LeaderboardRowEntity {
            game_id: self.id,
            username: self.users.map(|user| user.username),
            score: self.score,
            correct_guesses: self.correctguesses,
            incorrect_guesses: self.incorrectguesses,
            time_limit_secs: self.timelimit,
            category_name: self
                .categories
                .map(|category| category.name)
                .unwrap_or_else(|| UNKNOWN_NAME.into()),
            team_name: self
                .teams
                .map(|team| team.name)
                .unwrap_or_else(|| UNKNOWN_NAME.into()),
            created_at: parse_optional(self.created_at.as_deref(), "created_at")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ChampionInsertRow {
    pub userid: Option<Uuid>,
    pub categoryid: Uuid,
    pub teamid: Uuid,
    pub timetaken: u32,
    pub totalguesses: u32,
    pub created_at: String,
}

impl From<NewChampionEntity> for ChampionInsertRow {
    fn from(champion: NewChampionEntity) -> Self {
        Self {
            userid: champion.user_id,
            categoryid: champion.category_id,
            teamid: champion.team_id,
            timetaken: champion.time_taken_secs,
            totalguesses: champion.total_guesses,
            created_at: to_rfc3339(champion.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChampionRow {
    pub id: Uuid,
    pub timetaken: u32,
    pub totalguesses: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub users: Option<UsernameRef>,
    #[serde(default)]
    pub categories: Option<NameRef>,
    #[serde(default)]
    pub teams: Option<NameRef>,
}

impl ChampionRow {
    pub fn try_into_entity(self) -> Result<ChampionRowEntity, RestStoreError> {
        Ok(ChampionRowEntity {
            id: self.id,
            username: self.users.map(|user| user.username),
            time_taken_secs: self.timetaken,
            total_guesses: self.totalguesses,
            category_name: self
                .categories
                .map(|category| category.name)
                .unwrap_or_else(|| UNKNOWN_NAME.into()),
            team_name: self
                .teams
                .map(|team| team.name)
                .unwrap_or_else(|| UNKNOWN_NAME.into()),
            created_at: parse_optional(self.created_at.as_deref(), "created_at")?,
        })
    }
}
