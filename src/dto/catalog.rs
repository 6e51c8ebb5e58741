use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{CategoryEntity, TeamEntity};

/// Public projection of a trivia category.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategorySummary {
    /// Stable identifier for the category.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Short blurb shown on the category picker.
    pub description: String,
}

/// Public projection of a team.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamSummary {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Category the team belongs to.
    pub category_id: Uuid,
}

/// Categories listed on the picker.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesResponse {
    /// All known categories.
    pub categories: Vec<CategorySummary>,
}

/// Teams listed once a category is picked.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamsResponse {
    /// Teams belonging to the requested category.
    pub teams: Vec<TeamSummary>,
}

impl From<CategoryEntity> for CategorySummary {
    fn from(category: CategoryEntity) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

impl From<TeamEntity> for TeamSummary {
    fn from(team: TeamEntity) -> Self {
        Self {
            id: team.id,
            name: team.name,
            category_id: team.category_id,
        }
    }
}
