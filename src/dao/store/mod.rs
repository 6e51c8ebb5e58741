#[cfg(test)]
pub mod memory;
#[cfg(feature = "rest-store")]
pub mod rest;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    CategoryEntity, ChampionRowEntity, GameCompletionEntity, GameEntity, LeaderboardRowEntity,
    NewChampionEntity, NewGameEntity, NewGuessEntity, NewUserEntity, PlayerEntity, TeamEntity,
    UserEntity,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the hosted relational store the game delegates
/// persistence to. The contract is intentionally small: equality-filtered
/// reads with ordering and limits, inserts, and updates by id.
pub trait RemoteStore: Send + Sync {
    /// All categories, unfiltered.
    fn list_categories(&self) -> BoxFuture<'static, StorageResult<Vec<CategoryEntity>>>;
    /// Teams belonging to one category.
    fn list_teams(&self, category_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    /// The fixed roster for a team, ordered by rank position.
    fn team_roster(&self, team_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Create a session row and return it with its store-assigned id.
    fn insert_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Apply the one-shot finalization update to a session row.
    fn finalize_game(
        &self,
        id: Uuid,
        completion: GameCompletionEntity,
    ) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Append one guess record.
    fn insert_guess(&self, guess: NewGuessEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a user by exact email.
    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Look up a user by exact username.
    fn find_user_by_username(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Register a leaderboard user and return the stored row.
    fn insert_user(&self, user: NewUserEntity) -> BoxFuture<'static, StorageResult<UserEntity>>;
    /// Completed sessions by descending score, display names expanded.
    fn leaderboard(&self, limit: u32)
    -> BoxFuture<'static, StorageResult<Vec<LeaderboardRowEntity>>>;
    /// Champions wall by ascending time taken, display names expanded.
    fn champions(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<ChampionRowEntity>>>;
    /// Record a qualifying session on the champions wall.
    fn insert_champion(
        &self,
        champion: NewChampionEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap reachability probe used by the supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish the connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
