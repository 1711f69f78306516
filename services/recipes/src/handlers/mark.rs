use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use uuid::Uuid;

use pantry_auth_types::identity::IdentityHeaders;

use crate::domain::shopping_list::render;
use crate::domain::types::{MarkKind, RecipeSummary};
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::mark::{AddRecipeMarkUseCase, RemoveRecipeMarkUseCase};
use crate::usecase::shopping_list::BuildShoppingListUseCase;

const SHOPPING_LIST_DISPOSITION: &str = "attachment; filename=\"shopping_list.txt\"";

async fn add_mark(
    state: &AppState,
    kind: MarkKind,
    user_id: Uuid,
    recipe_id: i32,
) -> Result<(StatusCode, Json<RecipeSummary>), RecipesServiceError> {
    let usecase = AddRecipeMarkUseCase {
        recipes: state.recipe_repo(),
        marks: state.mark_repo(kind),
        kind,
        media_url: state.media_url.clone(),
    };
    let summary = usecase.execute(user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

async fn remove_mark(
    state: &AppState,
    kind: MarkKind,
    user_id: Uuid,
    recipe_id: i32,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = RemoveRecipeMarkUseCase {
        recipes: state.recipe_repo(),
        marks: state.mark_repo(kind),
        kind,
    };
    usecase.execute(user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/recipes/{id}/favorite ──────────────────────────────────────────

pub async fn add_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeSummary>), RecipesServiceError> {
    add_mark(&state, MarkKind::Favorite, identity.user_id, id).await
}

// ── DELETE /api/recipes/{id}/favorite ────────────────────────────────────────

pub async fn remove_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    remove_mark(&state, MarkKind::Favorite, identity.user_id, id).await
}

// ── POST /api/recipes/{id}/shopping_cart ─────────────────────────────────────

pub async fn add_to_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeSummary>), RecipesServiceError> {
    add_mark(&state, MarkKind::ShoppingCart, identity.user_id, id).await
}

// ── DELETE /api/recipes/{id}/shopping_cart ───────────────────────────────────

pub async fn remove_from_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    remove_mark(&state, MarkKind::ShoppingCart, identity.user_id, id).await
}

// ── GET /api/recipes/download_shopping_cart ──────────────────────────────────

pub async fn download_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RecipesServiceError> {
    let usecase = BuildShoppingListUseCase {
        repo: state.shopping_list_repo(),
    };
    let items = usecase.execute(identity.user_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CONTENT_DISPOSITION, SHOPPING_LIST_DISPOSITION),
        ],
        render(&items),
    ))
}
