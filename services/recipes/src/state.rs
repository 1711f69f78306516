use std::path::PathBuf;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::domain::types::MarkKind;
use crate::infra::db::{
    DbFollowRepository, DbIngredientRepository, DbRecipeMarkRepository, DbRecipeRepository,
    DbShoppingListRepository, DbTagRepository, DbUserRepository,
};
use crate::infra::media::FsMediaStorage;
use crate::usecase::recipe::RecipePresenter;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Directory uploaded images are written to.
    pub media_root: PathBuf,
    /// Public URL prefix for stored images.
    pub media_url: String,
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }

    pub fn tag_repo(&self) -> DbTagRepository {
        DbTagRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn mark_repo(&self, kind: MarkKind) -> DbRecipeMarkRepository {
        DbRecipeMarkRepository {
            db: self.db.clone(),
            kind,
        }
    }

    pub fn shopping_list_repo(&self) -> DbShoppingListRepository {
        DbShoppingListRepository {
            db: self.db.clone(),
        }
    }

    pub fn media(&self) -> FsMediaStorage {
        FsMediaStorage {
            root: self.media_root.clone(),
            base_url: self.media_url.clone(),
        }
    }

    pub fn recipe_presenter(
        &self,
    ) -> RecipePresenter<DbFollowRepository, DbRecipeMarkRepository, DbRecipeMarkRepository> {
        RecipePresenter {
            follows: self.follow_repo(),
            favorites: self.mark_repo(MarkKind::Favorite),
            carts: self.mark_repo(MarkKind::ShoppingCart),
            media_url: self.media_url.clone(),
        }
    }
}
