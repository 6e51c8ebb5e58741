use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CategoriesResponse, TeamsResponse},
    error::AppError,
    services::catalog_service,
    state::SharedState,
};

/// Routes for browsing the category/team catalog.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}/teams", get(list_teams))
}

/// List every category.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "catalog",
    responses(
        (status = 200, description = "All categories", body = CategoriesResponse)
    )
)]
pub async fn list_categories(
    State(state): State<SharedState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let response = catalog_service::list_categories(&state).await?;
    Ok(Json(response))
}

/// List the teams of one category.
#[utoipa::path(
    get,
    path = "/categories/{id}/teams",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Identifier of the category")),
    responses(
        (status = 200, description = "Teams of the category", body = TeamsResponse)
    )
)]
pub async fn list_teams(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamsResponse>, AppError> {
    let response = catalog_service::list_teams(&state, id).await?;
    Ok(Json(response))
}
