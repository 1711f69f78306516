#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use uuid::Uuid;

use pantry_domain::pagination::{Page, PageRequest};

use crate::domain::image::DecodedImage;
use crate::domain::shopping_list::CartLine;
use crate::domain::tag::NewTag;
use crate::domain::types::{Ingredient, Recipe, RecipeDraft, RecipeFilter, RecipeSummary, Tag, User};
use crate::error::RecipesServiceError;

/// Repository for registered users.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError>;

    /// Insert a user. Fails with `UserAlreadyExists` when the email or username is taken.
    async fn create(&self, user: &User) -> Result<(), RecipesServiceError>;

    async fn list(&self, page: PageRequest) -> Result<Page<User>, RecipesServiceError>;

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), RecipesServiceError>;
}

/// Repository for the user → author follow relation.
pub trait FollowRepository: Send + Sync {
    /// Returns `false` when the pair is already present.
    async fn add(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError>;

    /// Returns `true` if a row was deleted.
    async fn remove(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError>;

    /// Subset of `author_ids` followed by `user_id`.
    async fn following_among(
        &self,
        user_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RecipesServiceError>;

    /// Authors followed by `user_id`, ordered by username.
    async fn list_authors(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<User>, RecipesServiceError>;
}

/// Repository for the tag catalog.
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, RecipesServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError>;
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RecipesServiceError>;

    /// Fails with `TagAlreadyExists` when the name, color or slug is taken.
    async fn create(&self, tag: &NewTag) -> Result<Tag, RecipesServiceError>;
}

/// Repository for the ingredient catalog.
pub trait IngredientRepository: Send + Sync {
    /// Ingredients ordered by name, optionally restricted to a case-insensitive name prefix.
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, RecipesServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError>;
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>, RecipesServiceError>;
}

/// Repository for the recipe aggregate.
///
/// `create` and `update` write the recipe row, its tag links and its
/// ingredient lines in one transaction.
pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, RecipesServiceError>;

    /// Newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesServiceError>;

    /// Returns the new recipe id.
    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, RecipesServiceError>;

    /// Replace scalar fields and the complete tag and ingredient sets.
    async fn update(&self, id: i32, draft: &RecipeDraft) -> Result<(), RecipesServiceError>;

    /// Returns `true` if a row was deleted. Dependent rows cascade.
    async fn delete(&self, id: i32) -> Result<bool, RecipesServiceError>;

    /// Newest recipes of an author, at most `limit` when given.
    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RecipesServiceError>;
}

/// Repository for one user → recipe mark relation (favorites or shopping cart).
pub trait RecipeMarkRepository: Send + Sync {
    /// Returns `false` when the pair is already present.
    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError>;

    /// Returns `true` if a row was deleted.
    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError>;

    /// Subset of `recipe_ids` marked by `user_id`.
    async fn marked_among(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, RecipesServiceError>;
}

/// Ingredient lines of every recipe in a user's shopping cart.
pub trait ShoppingListRepository: Send + Sync {
    async fn cart_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, RecipesServiceError>;
}

/// Storage for uploaded recipe images.
pub trait MediaStorage: Send + Sync {
    /// Persist the image and return its path relative to the media root.
    async fn save_image(&self, image: &DecodedImage) -> Result<String, RecipesServiceError>;

    async fn remove(&self, path: &str) -> Result<(), RecipesServiceError>;

    /// Public URL prefix prepended to stored paths.
    fn base_url(&self) -> &str;
}
