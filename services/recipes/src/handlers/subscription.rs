use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use pantry_auth_types::identity::IdentityHeaders;
use pantry_domain::pagination::{Page, PageRequest};

use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::follow::{
    FollowAuthorUseCase, ListSubscriptionsUseCase, SubscriptionView, UnfollowAuthorUseCase,
};

/// `recipes_limit` caps the condensed recipes returned per author.
#[derive(Deserialize, Default)]
pub struct SubscriptionQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<u64>,
}

// ── GET /api/users/subscriptions ─────────────────────────────────────────────

pub async fn list_subscriptions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Json<Page<SubscriptionView>>, RecipesServiceError> {
    let usecase = ListSubscriptionsUseCase {
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
        media_url: state.media_url.clone(),
    };
    let page = PageRequest::new(query.limit, query.page);
    let subscriptions = usecase
        .execute(identity.user_id, page, query.recipes_limit)
        .await?;
    Ok(Json(subscriptions))
}

// ── POST /api/users/{id}/subscribe ───────────────────────────────────────────

pub async fn subscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<(StatusCode, Json<SubscriptionView>), RecipesServiceError> {
    let usecase = FollowAuthorUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
        media_url: state.media_url.clone(),
    };
    let view = usecase
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

// ── DELETE /api/users/{id}/subscribe ─────────────────────────────────────────

pub async fn unsubscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = UnfollowAuthorUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    usecase.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
