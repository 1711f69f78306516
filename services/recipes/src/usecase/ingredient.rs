use crate::domain::repository::IngredientRepository;
use crate::domain::types::Ingredient;
use crate::error::RecipesServiceError;

// ── ListIngredients ──────────────────────────────────────────────────────────

pub struct ListIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> ListIngredientsUseCase<R> {
    /// Blank prefixes are ignored.
    pub async fn execute(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let prefix = name_prefix.map(str::trim).filter(|p| !p.is_empty());
        self.repo.list(prefix).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, RecipesServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::IngredientNotFound)
    }
}
