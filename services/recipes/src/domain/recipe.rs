//! Write and read representations of the recipe aggregate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::image::media_url;
use crate::domain::types::{IngredientAmount, Recipe, RecipeIngredient, Tag, UserView};
use crate::error::RecipesServiceError;

pub const RECIPE_NAME_MAX_LEN: usize = 200;
pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_COOKING_TIME: i32 = 1440;
pub const MIN_AMOUNT: i32 = 1;
pub const MAX_AMOUNT: i32 = 99_999;

/// Recipe payload as submitted by an author.
///
/// Creation needs every field except `image`. An update may omit `name`,
/// `text`, `cooking_time` and `image` (the stored values are kept) but must
/// resend the complete `tags` and `ingredients` sets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeWriteModel {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    /// `data:image/<ext>;base64,<payload>`
    pub image: Option<String>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// Payload that passed every field rule. Referenced ids are not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecipe {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeWriteModel {
    /// Apply the field rules. `current` supplies omitted scalar fields on update.
    pub fn validate(self, current: Option<&Recipe>) -> Result<ValidatedRecipe, RecipesServiceError> {
        let name = self
            .name
            .or_else(|| current.map(|r| r.name.clone()))
            .ok_or(RecipesServiceError::MissingData("name"))?;
        if name.trim().is_empty() || name.chars().count() > RECIPE_NAME_MAX_LEN {
            return Err(RecipesServiceError::InvalidRecipeName);
        }

        let text = self
            .text
            .or_else(|| current.map(|r| r.text.clone()))
            .ok_or(RecipesServiceError::MissingData("text"))?;
        if text.trim().is_empty() {
            return Err(RecipesServiceError::InvalidRecipeText);
        }

        let cooking_time = self
            .cooking_time
            .or_else(|| current.map(|r| r.cooking_time))
            .ok_or(RecipesServiceError::MissingData("cooking_time"))?;
        if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&cooking_time) {
            return Err(RecipesServiceError::InvalidCookingTime);
        }

        let tag_ids = self.tags.ok_or(RecipesServiceError::MissingData("tags"))?;
        validate_tags(&tag_ids)?;

        let ingredients = self
            .ingredients
            .ok_or(RecipesServiceError::MissingData("ingredients"))?;
        validate_ingredients(&ingredients)?;

        Ok(ValidatedRecipe {
            name,
            text,
            cooking_time,
            image: self.image,
            tag_ids,
            ingredients,
        })
    }
}

fn validate_tags(tag_ids: &[i32]) -> Result<(), RecipesServiceError> {
    if tag_ids.is_empty() {
        return Err(RecipesServiceError::EmptyTags);
    }
    let mut seen = HashSet::with_capacity(tag_ids.len());
    if !tag_ids.iter().all(|id| seen.insert(*id)) {
        return Err(RecipesServiceError::DuplicateTags);
    }
    Ok(())
}

fn validate_ingredients(ingredients: &[IngredientAmount]) -> Result<(), RecipesServiceError> {
    if ingredients.is_empty() {
        return Err(RecipesServiceError::EmptyIngredients);
    }
    let mut seen = HashSet::with_capacity(ingredients.len());
    for line in ingredients {
        if !seen.insert(line.ingredient_id) {
            return Err(RecipesServiceError::DuplicateIngredients);
        }
        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&line.amount) {
            return Err(RecipesServiceError::InvalidAmount);
        }
    }
    Ok(())
}

/// Caller-relative flags of a recipe. All false for anonymous callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerFlags {
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub author_is_subscribed: bool,
}

/// Recipe as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeReadModel {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeReadModel {
    pub fn from_recipe(recipe: Recipe, flags: ViewerFlags, media_base: &str) -> Self {
        Self {
            id: recipe.id,
            tags: recipe.tags,
            author: UserView::new(recipe.author, flags.author_is_subscribed),
            ingredients: recipe.ingredients,
            is_favorited: flags.is_favorited,
            is_in_shopping_cart: flags.is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image.map(|path| media_url(media_base, &path)),
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}
