use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::domain::types::Ingredient;
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::ingredient::{GetIngredientUseCase, ListIngredientsUseCase};

#[derive(Deserialize, Default)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

// ── GET /api/ingredients ─────────────────────────────────────────────────────

pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<Ingredient>>, RecipesServiceError> {
    let usecase = ListIngredientsUseCase {
        repo: state.ingredient_repo(),
    };
    Ok(Json(usecase.execute(query.name.as_deref()).await?))
}

// ── GET /api/ingredients/{id} ────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Ingredient>, RecipesServiceError> {
    let usecase = GetIngredientUseCase {
        repo: state.ingredient_repo(),
    };
    Ok(Json(usecase.execute(id).await?))
}
