//! In-memory [`RemoteStore`] used by service tests. Behaves like the real
//! store for the operations the services exercise, including injectable
//! write failures.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{
        CategoryEntity, ChampionRowEntity, GameCompletionEntity, GameEntity, GameStatus,
        LeaderboardRowEntity, NewChampionEntity, NewGameEntity, NewGuessEntity, NewUserEntity,
        PlayerEntity, TeamEntity, UserEntity,
    },
    storage::{StorageError, StorageResult},
    store::RemoteStore,
};

#[derive(Default)]
struct Inner {
    categories: Vec<CategoryEntity>,
    teams: Vec<TeamEntity>,
    players: Vec<PlayerEntity>,
    games: Vec<GameEntity>,
    guesses: Vec<NewGuessEntity>,
    users: Vec<UserEntity>,
    champions: Vec<NewChampionEntity>,
    fail_guess_inserts: u32,
    fail_finalizations: u32,
    finalize_calls: u32,
}

/// Shared in-memory store; clones observe the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

fn injected_failure(what: &str) -> StorageError {
    StorageError::unavailable(
        format!("injected {what} failure"),
        std::io::Error::other("injected"),
    )
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the reference tables.
    pub fn seed(
        &self,
        categories: Vec<CategoryEntity>,
        teams: Vec<TeamEntity>,
        players: Vec<PlayerEntity>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner.categories = categories;
        inner.teams = teams;
        inner.players = players;
    }

    /// Make the next `n` guess inserts fail.
    pub fn fail_next_guess_inserts(&self, n: u32) {
        self.inner.lock().unwrap().fail_guess_inserts = n;
    }

    /// Make the next `n` finalization writes fail.
    pub fn fail_next_finalizations(&self, n: u32) {
        self.inner.lock().unwrap().fail_finalizations = n;
    }

    /// Number of guess rows appended so far.
    pub fn guess_count(&self) -> usize {
        self.inner.lock().unwrap().guesses.len()
    }

    /// Number of finalization writes attempted (including failed ones).
    pub fn finalize_calls(&self) -> u32 {
        self.inner.lock().unwrap().finalize_calls
    }

    /// Number of champion rows recorded.
    pub fn champion_count(&self) -> usize {
        self.inner.lock().unwrap().champions.len()
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    /// Fetch a stored game row by id.
    pub fn game(&self, id: Uuid) -> Option<GameEntity> {
        self.inner
            .lock()
            .unwrap()
            .games
            .iter()
            .find(|game| game.id == id)
            .cloned()
    }
}

impl RemoteStore for MemoryStore {
    fn list_categories(&self) -> BoxFuture<'static, StorageResult<Vec<CategoryEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.lock().unwrap().categories.clone()) })
    }

    fn list_teams(&self, category_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .lock()
                .unwrap()
                .teams
                .iter()
                .filter(|team| team.category_id == category_id)
                .cloned()
                .collect())
        })
    }

    fn team_roster(&self, team_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut roster = store
                .inner
                .lock()
                .unwrap()
                .players
                .iter()
                .filter(|player| player.team_id == team_id)
                .cloned()
                .collect::<Vec<_>>();
            roster.sort_by_key(|player| player.rank);
            Ok(roster)
        })
    }

    fn insert_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let entity = GameEntity {
                id: Uuid::new_v4(),
                user_id: game.user_id,
                category_id: game.category_id,
                team_id: game.team_id,
                time_limit_secs: game.time_limit_secs,
                started_at: game.started_at,
                ended_at: None,
                score: 0,
                correct_guesses: 0,
                incorrect_guesses: 0,
                status: game.status,
            };
            store.inner.lock().unwrap().games.push(entity.clone());
            Ok(entity)
        })
    }

    fn finalize_game(
        &self,
        id: Uuid,
        completion: GameCompletionEntity,
    ) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let mut inner = store.inner.lock().unwrap();
            inner.finalize_calls += 1;
            if inner.fail_finalizations > 0 {
                inner.fail_finalizations -= 1;
                return Err(injected_failure("finalization"));
            }

            let game = inner
                .games
                .iter_mut()
                .find(|game| game.id == id)
                .ok_or_else(|| StorageError::rejected(format!("no game `{id}`")))?;

            game.ended_at = Some(completion.ended_at);
            game.score = completion.score;
            game.correct_guesses = completion.correct_guesses;
            game.incorrect_guesses = completion.incorrect_guesses;
            game.status = completion.status;
            Ok(game.clone())
        })
    }

    fn insert_guess(&self, guess: NewGuessEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut inner = store.inner.lock().unwrap();
            if inner.fail_guess_inserts > 0 {
                inner.fail_guess_inserts -= 1;
                return Err(injected_failure("guess insert"));
            }
            inner.guesses.push(guess);
            Ok(())
        })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .lock()
                .unwrap()
                .users
                .iter()
                .find(|user| user.email == email)
                .cloned())
        })
    }

    fn find_user_by_username(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .lock()
                .unwrap()
                .users
                .iter()
                .find(|user| user.username == username)
                .cloned())
        })
    }

    fn insert_user(&self, user: NewUserEntity) -> BoxFuture<'static, StorageResult<UserEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let entity = UserEntity {
                id: Uuid::new_v4(),
                email: user.email,
                username: user.username,
                created_at: user.created_at,
            };
            store.inner.lock().unwrap().users.push(entity.clone());
            Ok(entity)
        })
    }

    fn leaderboard(
        &self,
        limit: u32,
    ) -> BoxFuture<'static, StorageResult<Vec<LeaderboardRowEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let inner = store.inner.lock().unwrap();
            let mut rows = inner
                .games
                .iter()
                .filter(|game| game.status == GameStatus::Completed)
                .map(|game| LeaderboardRowEntity {
                    game_id: game.id,
                    username: None,
                    score: game.score,
                    correct_guesses: game.correct_guesses,
                    incorrect_guesses: game.incorrect_guesses,
                    time_limit_secs: game.time_limit_secs,
                    category_name: "unknown".into(),
                    team_name: "unknown".into(),
                    created_at: Some(game.started_at),
                })
                .collect::<Vec<_>>();
            rows.sort_by(|a, b| b.score.cmp(&a.score));
            rows.truncate(limit as usize);
            Ok(rows)
        })
    }

    fn champions(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<ChampionRowEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let inner = store.inner.lock().unwrap();
            let mut rows = inner
                .champions
                .iter()
                .map(|champion| ChampionRowEntity {
                    id: Uuid::new_v4(),
                    username: None,
                    time_taken_secs: champion.time_taken_secs,
                    total_guesses: champion.total_guesses,
                    category_name: "unknown".into(),
                    team_name: "unknown".into(),
                    created_at: Some(champion.created_at),
                })
                .collect::<Vec<_>>();
            rows.sort_by_key(|row| row.time_taken_secs);
            rows.truncate(limit as usize);
            Ok(rows)
        })
    }

    fn insert_champion(
        &self,
        champion: NewChampionEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.lock().unwrap().champions.push(champion);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
