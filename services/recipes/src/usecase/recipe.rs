use std::collections::HashSet;

use tracing::{info, warn};
use uuid::Uuid;

use pantry_domain::pagination::{Page, PageRequest};

use crate::domain::image::decode_data_uri;
use crate::domain::recipe::{RecipeReadModel, RecipeWriteModel, ValidatedRecipe, ViewerFlags};
use crate::domain::repository::{
    FollowRepository, IngredientRepository, MediaStorage, RecipeMarkRepository, RecipeRepository,
    TagRepository,
};
use crate::domain::types::{Recipe, RecipeDraft, RecipeFilter};
use crate::error::RecipesServiceError;
use crate::usecase::follow::followed_authors;

// ── Presenter ────────────────────────────────────────────────────────────────

/// Maps stored recipes to read models with the caller-relative flags.
pub struct RecipePresenter<F: FollowRepository, V: RecipeMarkRepository, C: RecipeMarkRepository> {
    pub follows: F,
    pub favorites: V,
    pub carts: C,
    pub media_url: String,
}

impl<F: FollowRepository, V: RecipeMarkRepository, C: RecipeMarkRepository> RecipePresenter<F, V, C> {
    pub async fn present(
        &self,
        viewer: Option<Uuid>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeReadModel>, RecipesServiceError> {
        let Some(viewer) = viewer else {
            return Ok(recipes
                .into_iter()
                .map(|r| RecipeReadModel::from_recipe(r, ViewerFlags::default(), &self.media_url))
                .collect());
        };

        let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author.id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let favorited = self.marked(&self.favorites, viewer, &recipe_ids).await?;
        let carted = self.marked(&self.carts, viewer, &recipe_ids).await?;
        let followed = followed_authors(&self.follows, Some(viewer), &author_ids).await?;

        Ok(recipes
            .into_iter()
            .map(|r| {
                let flags = ViewerFlags {
                    is_favorited: favorited.contains(&r.id),
                    is_in_shopping_cart: carted.contains(&r.id),
                    author_is_subscribed: followed.contains(&r.author.id),
                };
                RecipeReadModel::from_recipe(r, flags, &self.media_url)
            })
            .collect())
    }

    pub async fn present_one(
        &self,
        viewer: Option<Uuid>,
        recipe: Recipe,
    ) -> Result<RecipeReadModel, RecipesServiceError> {
        let mut models = self.present(viewer, vec![recipe]).await?;
        models
            .pop()
            .ok_or_else(|| anyhow::anyhow!("presenter dropped a recipe").into())
    }

    async fn marked<M: RecipeMarkRepository>(
        &self,
        marks: &M,
        viewer: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, RecipesServiceError> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        marks.marked_among(viewer, recipe_ids).await
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<
    R: RecipeRepository,
    F: FollowRepository,
    V: RecipeMarkRepository,
    C: RecipeMarkRepository,
> {
    pub recipes: R,
    pub presenter: RecipePresenter<F, V, C>,
}

impl<R: RecipeRepository, F: FollowRepository, V: RecipeMarkRepository, C: RecipeMarkRepository>
    GetRecipeUseCase<R, F, V, C>
{
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        id: i32,
    ) -> Result<RecipeReadModel, RecipesServiceError> {
        let recipe = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        self.presenter.present_one(viewer, recipe).await
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

/// Listing query as sent by the client.
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub author: Option<Uuid>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeQuery {
    /// Resolve against the caller. The boolean filters only apply to an
    /// authenticated caller; for anonymous callers they are dropped.
    pub fn into_filter(self, viewer: Option<Uuid>) -> RecipeFilter {
        RecipeFilter {
            author_id: self.author,
            tags: self.tags,
            favorited_by: viewer.filter(|_| self.is_favorited),
            in_cart_of: viewer.filter(|_| self.is_in_shopping_cart),
        }
    }
}

pub struct ListRecipesUseCase<
    R: RecipeRepository,
    F: FollowRepository,
    V: RecipeMarkRepository,
    C: RecipeMarkRepository,
> {
    pub recipes: R,
    pub presenter: RecipePresenter<F, V, C>,
}

impl<R: RecipeRepository, F: FollowRepository, V: RecipeMarkRepository, C: RecipeMarkRepository>
    ListRecipesUseCase<R, F, V, C>
{
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        query: RecipeQuery,
        page: PageRequest,
    ) -> Result<Page<RecipeReadModel>, RecipesServiceError> {
        let filter = query.into_filter(viewer);
        let recipes = self.recipes.list(&filter, page).await?;
        let results = self.presenter.present(viewer, recipes.results).await?;
        Ok(Page::new(recipes.count, results))
    }
}

// ── Shared write-path steps ──────────────────────────────────────────────────

/// Every referenced tag and ingredient must exist. Ids are already deduplicated.
async fn ensure_references<T: TagRepository, I: IngredientRepository>(
    tags: &T,
    ingredients: &I,
    recipe: &ValidatedRecipe,
) -> Result<(), RecipesServiceError> {
    if tags.find_by_ids(&recipe.tag_ids).await?.len() != recipe.tag_ids.len() {
        return Err(RecipesServiceError::TagNotFound);
    }
    let ingredient_ids: Vec<i32> = recipe
        .ingredients
        .iter()
        .map(|line| line.ingredient_id)
        .collect();
    if ingredients.find_by_ids(&ingredient_ids).await?.len() != ingredient_ids.len() {
        return Err(RecipesServiceError::IngredientNotFound);
    }
    Ok(())
}

async fn discard_image<S: MediaStorage>(media: &S, path: &str) {
    if let Err(e) = media.remove(path).await {
        warn!(error = %e, path, "failed to remove recipe image");
    }
}

/// Decode, check references, then store the image. Nothing is written before
/// every check has passed.
async fn prepare_draft<T: TagRepository, I: IngredientRepository, S: MediaStorage>(
    tags: &T,
    ingredients: &I,
    media: &S,
    recipe: ValidatedRecipe,
) -> Result<RecipeDraft, RecipesServiceError> {
    let image = recipe.image.as_deref().map(decode_data_uri).transpose()?;
    ensure_references(tags, ingredients, &recipe).await?;
    let image = match image {
        Some(image) => Some(media.save_image(&image).await?),
        None => None,
    };
    Ok(RecipeDraft {
        name: recipe.name,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        image,
        tag_ids: recipe.tag_ids,
        ingredients: recipe.ingredients,
    })
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: MediaStorage,
> {
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
    pub media: S,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository, S: MediaStorage>
    CreateRecipeUseCase<R, T, I, S>
{
    /// Returns the new recipe id.
    pub async fn execute(
        &self,
        author_id: Uuid,
        payload: RecipeWriteModel,
    ) -> Result<i32, RecipesServiceError> {
        let recipe = payload.validate(None)?;
        let draft = prepare_draft(&self.tags, &self.ingredients, &self.media, recipe).await?;
        match self.recipes.create(author_id, &draft).await {
            Ok(id) => {
                info!(recipe_id = id, %author_id, "recipe created");
                Ok(id)
            }
            Err(e) => {
                if let Some(path) = &draft.image {
                    discard_image(&self.media, path).await;
                }
                Err(e)
            }
        }
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: MediaStorage,
> {
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
    pub media: S,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository, S: MediaStorage>
    UpdateRecipeUseCase<R, T, I, S>
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: i32,
        payload: RecipeWriteModel,
    ) -> Result<(), RecipesServiceError> {
        let current = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if current.author.id != user_id {
            return Err(RecipesServiceError::Forbidden);
        }
        let recipe = payload.validate(Some(&current))?;
        let draft = prepare_draft(&self.tags, &self.ingredients, &self.media, recipe).await?;
        match self.recipes.update(id, &draft).await {
            Ok(()) => {
                if let (Some(_), Some(old)) = (&draft.image, &current.image) {
                    discard_image(&self.media, old).await;
                }
                info!(recipe_id = id, %user_id, "recipe updated");
                Ok(())
            }
            Err(e) => {
                if let Some(path) = &draft.image {
                    discard_image(&self.media, path).await;
                }
                Err(e)
            }
        }
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository, S: MediaStorage> {
    pub recipes: R,
    pub media: S,
}

impl<R: RecipeRepository, S: MediaStorage> DeleteRecipeUseCase<R, S> {
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<(), RecipesServiceError> {
        let current = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if current.author.id != user_id {
            return Err(RecipesServiceError::Forbidden);
        }
        if !self.recipes.delete(id).await? {
            return Err(RecipesServiceError::RecipeNotFound);
        }
        if let Some(path) = &current.image {
            discard_image(&self.media, path).await;
        }
        info!(recipe_id = id, %user_id, "recipe deleted");
        Ok(())
    }
}
