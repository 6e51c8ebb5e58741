//! Read-only projections of the category/team catalog.

use uuid::Uuid;

use crate::{
    dto::catalog::{CategoriesResponse, TeamsResponse},
    error::ServiceError,
    state::SharedState,
};

/// Return every category for the picker dropdown.
pub async fn list_categories(state: &SharedState) -> Result<CategoriesResponse, ServiceError> {
    let store = state.require_store().await?;
    let categories = store.list_categories().await?;
    Ok(CategoriesResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    })
}

/// Return the teams belonging to one category.
pub async fn list_teams(
    state: &SharedState,
    category_id: Uuid,
) -> Result<TeamsResponse, ServiceError> {
    let store = state.require_store().await?;
    let teams = store.list_teams(category_id).await?;
    Ok(TeamsResponse {
        teams: teams.into_iter().map(Into::into).collect(),
    })
}
