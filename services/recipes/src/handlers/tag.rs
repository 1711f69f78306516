use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use pantry_auth_types::identity::IdentityHeaders;

use crate::domain::tag::NewTag;
use crate::domain::types::Tag;
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::tag::{CreateTagUseCase, GetTagUseCase, ListTagsUseCase};

// ── GET /api/tags ────────────────────────────────────────────────────────────

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, RecipesServiceError> {
    let usecase = ListTagsUseCase {
        repo: state.tag_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── GET /api/tags/{id} ───────────────────────────────────────────────────────

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Tag>, RecipesServiceError> {
    let usecase = GetTagUseCase {
        repo: state.tag_repo(),
    };
    Ok(Json(usecase.execute(id).await?))
}

// ── POST /api/tags ───────────────────────────────────────────────────────────

pub async fn create_tag(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<NewTag>,
) -> Result<(StatusCode, Json<Tag>), RecipesServiceError> {
    if !identity.is_admin() {
        return Err(RecipesServiceError::Forbidden);
    }
    let usecase = CreateTagUseCase {
        repo: state.tag_repo(),
    };
    let tag = usecase.execute(body).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}
