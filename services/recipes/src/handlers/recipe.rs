use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use serde::Deserialize;
use uuid::Uuid;

use pantry_auth_types::identity::IdentityHeaders;
use pantry_domain::pagination::{Page, PageRequest};

use crate::domain::recipe::{RecipeReadModel, RecipeWriteModel};
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase, RecipeQuery,
    UpdateRecipeUseCase,
};

// ── Query params ─────────────────────────────────────────────────────────────

/// `tags` may repeat: `?tags=breakfast&tags=dinner`.
#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub author: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

/// Boolean filters arrive as `1`/`0` or `true`/`false`.
fn is_set(flag: Option<&str>) -> bool {
    matches!(flag, Some("1" | "true"))
}

impl RecipeListQuery {
    fn split(self) -> (RecipeQuery, PageRequest) {
        let page = PageRequest::new(self.limit, self.page);
        let query = RecipeQuery {
            author: self.author,
            tags: self.tags,
            is_favorited: is_set(self.is_favorited.as_deref()),
            is_in_shopping_cart: is_set(self.is_in_shopping_cart.as_deref()),
        };
        (query, page)
    }
}

async fn read_model(
    state: &AppState,
    viewer: Option<Uuid>,
    id: i32,
) -> Result<RecipeReadModel, RecipesServiceError> {
    let usecase = GetRecipeUseCase {
        recipes: state.recipe_repo(),
        presenter: state.recipe_presenter(),
    };
    usecase.execute(viewer, id).await
}

// ── GET /api/recipes ─────────────────────────────────────────────────────────

pub async fn list_recipes(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Page<RecipeReadModel>>, RecipesServiceError> {
    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
        presenter: state.recipe_presenter(),
    };
    let (query, page) = query.split();
    let recipes = usecase
        .execute(identity.map(|i| i.user_id), query, page)
        .await?;
    Ok(Json(recipes))
}

// ── GET /api/recipes/{id} ────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeReadModel>, RecipesServiceError> {
    let recipe = read_model(&state, identity.map(|i| i.user_id), id).await?;
    Ok(Json(recipe))
}

// ── POST /api/recipes ────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RecipeWriteModel>,
) -> Result<(StatusCode, Json<RecipeReadModel>), RecipesServiceError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
        media: state.media(),
    };
    let id = usecase.execute(identity.user_id, body).await?;
    let recipe = read_model(&state, Some(identity.user_id), id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

// ── PATCH /api/recipes/{id} ──────────────────────────────────────────────────

pub async fn update_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<RecipeWriteModel>,
) -> Result<Json<RecipeReadModel>, RecipesServiceError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
        media: state.media(),
    };
    usecase.execute(identity.user_id, id, body).await?;
    let recipe = read_model(&state, Some(identity.user_id), id).await?;
    Ok(Json(recipe))
}

// ── DELETE /api/recipes/{id} ─────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
        media: state.media(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
