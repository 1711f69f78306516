use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: u8,
    pub created_at: DateTime<Utc>,
}

/// User as seen by another caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserView {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Ingredient line of a stored recipe, expanded with its display name and unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Stored recipe with its author, tags and ingredient lines.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub author: User,
    pub name: String,
    /// Path relative to the media root.
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Condensed view used by mark relations and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

/// Ingredient reference of a recipe payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct IngredientAmount {
    #[serde(rename = "id")]
    pub ingredient_id: i32,
    pub amount: i32,
}

/// Validated recipe contents ready to be persisted.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    /// Stored image path; `None` keeps the current image on update.
    pub image: Option<String>,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Predicates applied to the recipe listing. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author_id: Option<Uuid>,
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub favorited_by: Option<Uuid>,
    pub in_cart_of: Option<Uuid>,
}

/// Which user-to-recipe mark relation an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Favorite,
    ShoppingCart,
}

impl MarkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping_cart",
        }
    }
}

impl RecipeSummary {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }

    /// Turn the stored image path into a public URL.
    pub fn with_media_url(mut self, base: &str) -> Self {
        self.image = self
            .image
            .map(|path| crate::domain::image::media_url(base, &path));
        self
    }
}
