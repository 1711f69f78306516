use uuid::Uuid;

use crate::domain::repository::ShoppingListRepository;
use crate::domain::shopping_list::{ShoppingListItem, aggregate};
use crate::error::RecipesServiceError;

pub struct BuildShoppingListUseCase<R: ShoppingListRepository> {
    pub repo: R,
}

impl<R: ShoppingListRepository> BuildShoppingListUseCase<R> {
    /// Empty cart yields an empty list.
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<ShoppingListItem>, RecipesServiceError> {
        let lines = self.repo.cart_lines(user_id).await?;
        Ok(aggregate(lines))
    }
}
