//! Add/remove for the favorite and shopping-cart mark relations.
//!
//! Each relation is present or absent per `(user, recipe)`. Adding a present
//! mark and removing an absent one both fail; the store's unique constraint
//! decides which of two racing adds wins.

use tracing::info;
use uuid::Uuid;

use crate::domain::repository::{RecipeMarkRepository, RecipeRepository};
use crate::domain::types::{MarkKind, RecipeSummary};
use crate::error::RecipesServiceError;

fn already_marked(kind: MarkKind) -> RecipesServiceError {
    match kind {
        MarkKind::Favorite => RecipesServiceError::AlreadyFavorited,
        MarkKind::ShoppingCart => RecipesServiceError::AlreadyInShoppingCart,
    }
}

fn not_marked(kind: MarkKind) -> RecipesServiceError {
    match kind {
        MarkKind::Favorite => RecipesServiceError::NotFavorited,
        MarkKind::ShoppingCart => RecipesServiceError::NotInShoppingCart,
    }
}

// ── AddRecipeMark ────────────────────────────────────────────────────────────

pub struct AddRecipeMarkUseCase<R: RecipeRepository, M: RecipeMarkRepository> {
    pub recipes: R,
    pub marks: M,
    pub kind: MarkKind,
    pub media_url: String,
}

impl<R: RecipeRepository, M: RecipeMarkRepository> AddRecipeMarkUseCase<R, M> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<RecipeSummary, RecipesServiceError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if !self.marks.add(user_id, recipe_id).await? {
            return Err(already_marked(self.kind));
        }
        info!(%user_id, recipe_id, mark = self.kind.as_str(), "recipe marked");
        Ok(RecipeSummary::from_recipe(&recipe).with_media_url(&self.media_url))
    }
}

// ── RemoveRecipeMark ─────────────────────────────────────────────────────────

pub struct RemoveRecipeMarkUseCase<R: RecipeRepository, M: RecipeMarkRepository> {
    pub recipes: R,
    pub marks: M,
    pub kind: MarkKind,
}

impl<R: RecipeRepository, M: RecipeMarkRepository> RemoveRecipeMarkUseCase<R, M> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), RecipesServiceError> {
        if self.recipes.find_by_id(recipe_id).await?.is_none() {
            return Err(RecipesServiceError::RecipeNotFound);
        }
        if !self.marks.remove(user_id, recipe_id).await? {
            return Err(not_marked(self.kind));
        }
        info!(%user_id, recipe_id, mark = self.kind.as_str(), "recipe unmarked");
        Ok(())
    }
}
