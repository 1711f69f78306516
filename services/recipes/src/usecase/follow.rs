use std::collections::HashSet;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use pantry_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{FollowRepository, RecipeRepository, UserRepository};
use crate::domain::types::{RecipeSummary, User, UserView};
use crate::error::RecipesServiceError;

/// Followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: u64,
}

/// Authors among `author_ids` that `viewer` follows. Empty for anonymous callers.
pub(crate) async fn followed_authors<F: FollowRepository>(
    follows: &F,
    viewer: Option<Uuid>,
    author_ids: &[Uuid],
) -> Result<HashSet<Uuid>, RecipesServiceError> {
    match viewer {
        Some(viewer) if !author_ids.is_empty() => follows.following_among(viewer, author_ids).await,
        _ => Ok(HashSet::new()),
    }
}

async fn subscription_view<R: RecipeRepository>(
    recipes: &R,
    author: User,
    recipes_limit: Option<u64>,
    media_url: &str,
) -> Result<SubscriptionView, RecipesServiceError> {
    let summaries = recipes.summaries_by_author(author.id, recipes_limit).await?;
    let recipes_count = recipes.count_by_author(author.id).await?;
    Ok(SubscriptionView {
        author: UserView::new(author, true),
        recipes: summaries
            .into_iter()
            .map(|s| s.with_media_url(media_url))
            .collect(),
        recipes_count,
    })
}

// ── FollowAuthor ─────────────────────────────────────────────────────────────

pub struct FollowAuthorUseCase<U: UserRepository, F: FollowRepository, R: RecipeRepository> {
    pub users: U,
    pub follows: F,
    pub recipes: R,
    pub media_url: String,
}

impl<U: UserRepository, F: FollowRepository, R: RecipeRepository> FollowAuthorUseCase<U, F, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        author_id: Uuid,
        recipes_limit: Option<u64>,
    ) -> Result<SubscriptionView, RecipesServiceError> {
        // Checked before anything else, whatever rows already exist.
        if user_id == author_id {
            return Err(RecipesServiceError::CannotFollowSelf);
        }
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        if !self.follows.add(user_id, author_id).await? {
            return Err(RecipesServiceError::AlreadySubscribed);
        }
        info!(%user_id, %author_id, "author followed");
        subscription_view(&self.recipes, author, recipes_limit, &self.media_url).await
    }
}

// ── UnfollowAuthor ───────────────────────────────────────────────────────────

pub struct UnfollowAuthorUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> UnfollowAuthorUseCase<U, F> {
    pub async fn execute(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RecipesServiceError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(RecipesServiceError::UserNotFound);
        }
        if !self.follows.remove(user_id, author_id).await? {
            return Err(RecipesServiceError::NotSubscribed);
        }
        info!(%user_id, %author_id, "author unfollowed");
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<F: FollowRepository, R: RecipeRepository> {
    pub follows: F,
    pub recipes: R,
    pub media_url: String,
}

impl<F: FollowRepository, R: RecipeRepository> ListSubscriptionsUseCase<F, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Page<SubscriptionView>, RecipesServiceError> {
        let authors = self.follows.list_authors(user_id, page).await?;
        let mut results = Vec::with_capacity(authors.results.len());
        for author in authors.results {
            results.push(
                subscription_view(&self.recipes, author, recipes_limit, &self.media_url).await?,
            );
        }
        Ok(Page::new(authors.count, results))
    }
}
