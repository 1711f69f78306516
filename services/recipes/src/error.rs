use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pantry_domain::user::UsernameError;

/// Recipes service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecipesServiceError {
    // ── 404 ──
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("recipe is not in favorites")]
    NotFavorited,
    #[error("recipe is not in the shopping cart")]
    NotInShoppingCart,
    #[error("not subscribed to this author")]
    NotSubscribed,

    // ── 409 ──
    #[error("recipe is already in favorites")]
    AlreadyFavorited,
    #[error("recipe is already in the shopping cart")]
    AlreadyInShoppingCart,
    #[error("already subscribed to this author")]
    AlreadySubscribed,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("tag already exists")]
    TagAlreadyExists,

    // ── 400 ──
    #[error("at least one ingredient is required")]
    EmptyIngredients,
    #[error("at least one tag is required")]
    EmptyTags,
    #[error("duplicate ingredients")]
    DuplicateIngredients,
    #[error("duplicate tags")]
    DuplicateTags,
    #[error("ingredient amount must be between 1 and 99999")]
    InvalidAmount,
    #[error("cooking time must be between 1 and 1440 minutes")]
    InvalidCookingTime,
    #[error("recipe name must be 1-200 characters")]
    InvalidRecipeName,
    #[error("recipe text must not be empty")]
    InvalidRecipeText,
    #[error("cannot follow yourself")]
    CannotFollowSelf,
    #[error("{0}")]
    InvalidUsername(#[from] UsernameError),
    #[error("invalid email")]
    InvalidEmail,
    #[error("{0} must be 1-150 characters")]
    InvalidName(&'static str),
    #[error("password must not be empty")]
    EmptyPassword(&'static str),
    #[error("current password is incorrect")]
    InvalidPassword,
    #[error("tag name must be 1-200 characters")]
    InvalidTagName,
    #[error("tag color must be a #RRGGBB hex value")]
    InvalidTagColor,
    #[error("tag slug may contain only letters, digits, hyphens and underscores")]
    InvalidTagSlug,
    #[error("invalid image")]
    InvalidImage,
    #[error("missing data")]
    MissingData(&'static str),

    // ── 403 ──
    #[error("forbidden")]
    Forbidden,

    // ── 500 ──
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RecipesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::NotFavorited => "NOT_FAVORITED",
            Self::NotInShoppingCart => "NOT_IN_SHOPPING_CART",
            Self::NotSubscribed => "NOT_SUBSCRIBED",
            Self::AlreadyFavorited => "ALREADY_FAVORITED",
            Self::AlreadyInShoppingCart => "ALREADY_IN_SHOPPING_CART",
            Self::AlreadySubscribed => "ALREADY_SUBSCRIBED",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::TagAlreadyExists => "TAG_ALREADY_EXISTS",
            Self::EmptyIngredients => "EMPTY_INGREDIENTS",
            Self::EmptyTags => "EMPTY_TAGS",
            Self::DuplicateIngredients => "DUPLICATE_INGREDIENTS",
            Self::DuplicateTags => "DUPLICATE_TAGS",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidCookingTime => "INVALID_COOKING_TIME",
            Self::InvalidRecipeName => "INVALID_RECIPE_NAME",
            Self::InvalidRecipeText => "INVALID_RECIPE_TEXT",
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidName(_) => "INVALID_NAME",
            Self::EmptyPassword(_) => "EMPTY_PASSWORD",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidTagName => "INVALID_TAG_NAME",
            Self::InvalidTagColor => "INVALID_TAG_COLOR",
            Self::InvalidTagSlug => "INVALID_TAG_SLUG",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::MissingData(_) => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Request field a validation error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyIngredients | Self::DuplicateIngredients | Self::InvalidAmount => {
                Some("ingredients")
            }
            Self::EmptyTags | Self::DuplicateTags => Some("tags"),
            Self::InvalidCookingTime => Some("cooking_time"),
            Self::InvalidRecipeName | Self::InvalidTagName => Some("name"),
            Self::InvalidRecipeText => Some("text"),
            Self::InvalidUsername(_) => Some("username"),
            Self::InvalidEmail => Some("email"),
            Self::InvalidName(field) | Self::EmptyPassword(field) | Self::MissingData(field) => {
                Some(*field)
            }
            Self::InvalidPassword => Some("current_password"),
            Self::InvalidTagColor => Some("color"),
            Self::InvalidTagSlug => Some("slug"),
            Self::InvalidImage => Some("image"),
            _ => None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::RecipeNotFound
            | Self::UserNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::NotFavorited
            | Self::NotInShoppingCart
            | Self::NotSubscribed => StatusCode::NOT_FOUND,
            Self::AlreadyFavorited
            | Self::AlreadyInShoppingCart
            | Self::AlreadySubscribed
            | Self::UserAlreadyExists
            | Self::TagAlreadyExists => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for RecipesServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Some(field) = self.field() {
            body["field"] = serde_json::Value::from(field);
        }
        (status, axum::Json(body)).into_response()
    }
}
