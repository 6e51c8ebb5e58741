use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, header};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::dao::{
    models::{
        CategoryEntity, ChampionRowEntity, GameCompletionEntity, GameEntity, LeaderboardRowEntity,
        NewChampionEntity, NewGameEntity, NewGuessEntity, NewUserEntity, PlayerEntity, TeamEntity,
        UserEntity,
    },
    storage::StorageResult,
    store::RemoteStore,
};

use super::{
    config::RestConfig,
    error::{RestResult, RestStoreError},
    models::{
        CHAMPION_SELECT, CategoryRow, ChampionInsertRow, ChampionRow, GameCompletionRow,
        GameInsertRow, GameRow, GuessInsertRow, LEADERBOARD_SELECT, LeaderboardRow, PlayerRow,
        TeamRow, UserInsertRow, UserRow,
    },
};

/// Header asking the store to echo written rows back in the response body.
const PREFER_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");
/// Header asking the store for a bodyless write acknowledgement.
const PREFER_MINIMAL: (&str, &str) = ("Prefer", "return=minimal");

/// Client for the hosted relational store's table API.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: Arc<str>,
    api_key: Option<Arc<str>>,
}

impl RestStore {
    /// Build the HTTP client and verify the store answers before handing the
    /// instance out.
    pub async fn connect(config: RestConfig) -> RestResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| RestStoreError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
            api_key: config.api_key.map(Arc::<str>::from),
        };

        store.ensure_reachable().await?;
        Ok(store)
    }

    fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, table);
        let mut builder = self.client.request(method, url);
        if let Some(ref key) = self.api_key {
            builder = builder
                .header("apikey", key.as_ref())
                .bearer_auth(key.as_ref());
        }
        builder
    }

    /// Probe the API root; any successful answer means the store is up.
    async fn ensure_reachable(&self) -> RestResult<()> {
        let path = self.base_url.to_string();
        let mut builder = self.client.get(self.base_url.as_ref());
        if let Some(ref key) = self.api_key {
            builder = builder
                .header("apikey", key.as_ref())
                .bearer_auth(key.as_ref());
        }

        let response = builder
            .send()
            .await
            .map_err(|source| RestStoreError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RestStoreError::RequestStatus {
                path,
                status: response.status(),
            })
        }
    }

    async fn select<T>(&self, table: &str, query: &[(&str, String)]) -> RestResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, table)
            .query(query)
            .send()
            .await
            .map_err(|source| RestStoreError::RequestSend {
                path: table.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => {
                response
                    .json::<Vec<T>>()
                    .await
                    .map_err(|source| RestStoreError::DecodeResponse {
                        path: table.to_string(),
                        source,
                    })
            }
            other => Err(RestStoreError::RequestStatus {
                path: table.to_string(),
                status: other,
            }),
        }
    }

    /// Insert one row and return its stored representation.
    async fn insert_returning<B, T>(&self, table: &'static str, body: &B) -> RestResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, table)
            .header(PREFER_REPRESENTATION.0, PREFER_REPRESENTATION.1)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| RestStoreError::RequestSend {
                path: table.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(RestStoreError::RequestStatus {
                path: table.to_string(),
                status: response.status(),
            });
        }

        let mut rows =
            response
                .json::<Vec<T>>()
                .await
                .map_err(|source| RestStoreError::DecodeResponse {
                    path: table.to_string(),
                    source,
                })?;

        rows.pop()
            .ok_or(RestStoreError::EmptyRepresentation { table })
    }

    /// Insert one row, discarding the acknowledgement body.
    async fn insert_minimal<B>(&self, table: &str, body: &B) -> RestResult<()>
    where
        B: Serialize,
    {
        let response = self
            .request(Method::POST, table)
            .header(PREFER_MINIMAL.0, PREFER_MINIMAL.1)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| RestStoreError::RequestSend {
                path: table.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            other => Err(RestStoreError::RequestStatus {
                path: table.to_string(),
                status: other,
            }),
        }
    }

    /// Patch the row matching `id` and return its updated representation.
    async fn update_by_id<B, T>(&self, table: &'static str, id: Uuid, body: &B) -> RestResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .header(PREFER_REPRESENTATION.0, PREFER_REPRESENTATION.1)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| RestStoreError::RequestSend {
                path: table.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(RestStoreError::RequestStatus {
                path: table.to_string(),
                status: response.status(),
            });
        }

        let mut rows =
            response
                .json::<Vec<T>>()
                .await
                .map_err(|source| RestStoreError::DecodeResponse {
                    path: table.to_string(),
                    source,
                })?;

        rows.pop()
            .ok_or(RestStoreError::EmptyRepresentation { table })
    }

    async fn find_one_user(&self, column: &'static str, value: String) -> RestResult<Option<UserEntity>> {
        let rows = self
            .select::<UserRow>(
                "users",
                &[
                    ("select", "*".to_string()),
                    (column, format!("eq.{value}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        rows.into_iter()
            .next()
            .map(UserRow::try_into_entity)
            .transpose()
    }
}

impl RemoteStore for RestStore {
    fn list_categories(&self) -> BoxFuture<'static, StorageResult<Vec<CategoryEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = store
                .select::<CategoryRow>("categories", &[("select", "*".to_string())])
                .await?;
            Ok(rows.into_iter().map(Into::into).collect())
        })
    }

    fn list_teams(&self, category_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = store
                .select::<TeamRow>(
                    "teams",
                    &[
                        ("select", "*".to_string()),
                        ("categoryid", format!("eq.{category_id}")),
                    ],
                )
                .await?;
            Ok(rows.into_iter().map(Into::into).collect())
        })
    }

    fn team_roster(&self, team_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = store
                .select::<PlayerRow>(
                    "players",
                    &[
                        ("select", "*".to_string()),
                        ("teamid", format!("eq.{team_id}")),
                        ("order", "position.asc".to_string()),
                    ],
                )
                .await?;
            Ok(rows.into_iter().map(Into::into).collect())
        })
    }

    fn insert_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let row: GameRow = store
                .insert_returning("games", &GameInsertRow::from(game))
                .await?;
            Ok(row.try_into_entity()?)
        })
    }

    fn finalize_game(
        &self,
        id: Uuid,
        completion: GameCompletionEntity,
    ) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let row: GameRow = store
                .update_by_id("games", id, &GameCompletionRow::from(completion))
                .await?;
            Ok(row.try_into_entity()?)
        })
    }

    fn insert_guess(&self, guess: NewGuessEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert_minimal("game_guesses", &GuessInsertRow::from(guess))
                .await
                .map_err(Into::into)
        })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_one_user("email", email).await.map_err(Into::into) })
    }

    fn find_user_by_username(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one_user("username", username)
                .await
                .map_err(Into::into)
        })
    }

    fn insert_user(&self, user: NewUserEntity) -> BoxFuture<'static, StorageResult<UserEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let row: UserRow = store
                .insert_returning("users", &UserInsertRow::from(user))
                .await?;
            Ok(row.try_into_entity()?)
        })
    }

    fn leaderboard(
        &self,
        limit: u32,
    ) -> BoxFuture<'static, StorageResult<Vec<LeaderboardRowEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = store
                .select::<LeaderboardRow>(
                    "games",
                    &[
                        ("select", LEADERBOARD_SELECT.to_string()),
                        ("status", "eq.completed".to_string()),
                        ("order", "score.desc".to_string()),
                        ("limit", limit.to_string()),
                    ],
                )
                .await?;
            rows.into_iter()
                .map(|row| row.try_into_entity().map_err(Into::into))
                .collect()
        })
    }

    fn champions(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<ChampionRowEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = store
                .select::<ChampionRow>(
                    "champions",
                    &[
                        ("select", CHAMPION_SELECT.to_string()),
                        ("order", "timetaken.asc".to_string()),
                        ("limit", limit.to_string()),
                    ],
                )
                .await?;
            rows.into_iter()
                .map(|row| row.try_into_entity().map_err(Into::into))
                .collect()
        })
    }

    fn insert_champion(
        &self,
        champion: NewChampionEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert_minimal("champions", &ChampionInsertRow::from(champion))
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_reachable().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_reachable().await.map_err(Into::into) })
    }
}
