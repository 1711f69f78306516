use uuid::Uuid;

use pantry_recipes::domain::types::MarkKind;
use pantry_recipes::error::RecipesServiceError;
use pantry_recipes::usecase::mark::{AddRecipeMarkUseCase, RemoveRecipeMarkUseCase};

use crate::helpers::{MemoryMarks, MemoryStore, MockMedia, amount, recipe_payload};

fn add(store: &MemoryStore, kind: MarkKind) -> AddRecipeMarkUseCase<MemoryStore, MemoryMarks> {
    AddRecipeMarkUseCase {
        recipes: store.clone(),
        marks: store.marks(kind),
        kind,
        media_url: "/media/".to_owned(),
    }
}

fn remove(store: &MemoryStore, kind: MarkKind) -> RemoveRecipeMarkUseCase<MemoryStore, MemoryMarks> {
    RemoveRecipeMarkUseCase {
        recipes: store.clone(),
        marks: store.marks(kind),
        kind,
    }
}

async fn seeded_recipe(store: &MemoryStore) -> i32 {
    let author = store.add_user("chef");
    let tag = store.add_tag("dinner");
    let flour = store.add_ingredient("flour", "g");
    store
        .create_usecase(MockMedia::new())
        .execute(author.id, recipe_payload("Bread", &[&tag], vec![amount(&flour, 500)]))
        .await
        .unwrap()
}

// ── Favorites ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_favorite_recipe_and_return_summary() {
    let store = MemoryStore::new();
    let recipe_id = seeded_recipe(&store).await;
    let reader = store.add_user("reader");

    let summary = add(&store, MarkKind::Favorite)
        .execute(reader.id, recipe_id)
        .await
        .unwrap();
    assert_eq!(summary.id, recipe_id);
    assert_eq!(summary.name, "Bread");
    assert_eq!(store.marks(MarkKind::Favorite).rows(), vec![(reader.id, recipe_id)]);
}

#[tokio::test]
async fn should_conflict_on_second_favorite_without_changing_state() {
    let store = MemoryStore::new();
    let recipe_id = seeded_recipe(&store).await;
    let reader = store.add_user("reader");
    let usecase = add(&store, MarkKind::Favorite);

    usecase.execute(reader.id, recipe_id).await.unwrap();
    let after_first = store.marks(MarkKind::Favorite).rows();

    let result = usecase.execute(reader.id, recipe_id).await;
    assert!(
        matches!(result, Err(RecipesServiceError::AlreadyFavorited)),
        "expected AlreadyFavorited, got {result:?}"
    );
    assert_eq!(store.marks(MarkKind::Favorite).rows(), after_first);
}

#[tokio::test]
async fn should_fail_to_remove_absent_favorite() {
    let store = MemoryStore::new();
    let recipe_id = seeded_recipe(&store).await;
    let reader = store.add_user("reader");
    let other = store.add_user("other");
    add(&store, MarkKind::Favorite)
        .execute(other.id, recipe_id)
        .await
        .unwrap();
    let before = store.marks(MarkKind::Favorite).rows();

    let result = remove(&store, MarkKind::Favorite)
        .execute(reader.id, recipe_id)
        .await;
    assert!(matches!(result, Err(RecipesServiceError::NotFavorited)));
    assert_eq!(store.marks(MarkKind::Favorite).rows(), before);
}

#[tokio::test]
async fn should_fail_loudly_on_repeated_remove() {
    let store = MemoryStore::new();
    let recipe_id = seeded_recipe(&store).await;
    let reader = store.add_user("reader");
    add(&store, MarkKind::Favorite)
        .execute(reader.id, recipe_id)
        .await
        .unwrap();

    let usecase = remove(&store, MarkKind::Favorite);
    usecase.execute(reader.id, recipe_id).await.unwrap();
    let result = usecase.execute(reader.id, recipe_id).await;
    assert!(matches!(result, Err(RecipesServiceError::NotFavorited)));
}

#[tokio::test]
async fn should_return_recipe_not_found_for_unknown_recipe() {
    let store = MemoryStore::new();
    let result = add(&store, MarkKind::Favorite)
        .execute(Uuid::now_v7(), 404)
        .await;
    assert!(matches!(result, Err(RecipesServiceError::RecipeNotFound)));

    let result = remove(&store, MarkKind::ShoppingCart)
        .execute(Uuid::now_v7(), 404)
        .await;
    assert!(matches!(result, Err(RecipesServiceError::RecipeNotFound)));
}

// ── Shopping cart ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_cart_independent_from_favorites() {
    let store = MemoryStore::new();
    let recipe_id = seeded_recipe(&store).await;
    let reader = store.add_user("reader");

    add(&store, MarkKind::ShoppingCart)
        .execute(reader.id, recipe_id)
        .await
        .unwrap();
    let result = add(&store, MarkKind::ShoppingCart)
        .execute(reader.id, recipe_id)
        .await;
    assert!(matches!(result, Err(RecipesServiceError::AlreadyInShoppingCart)));
    assert!(store.marks(MarkKind::Favorite).rows().is_empty());

    let result = remove(&store, MarkKind::Favorite)
        .execute(reader.id, recipe_id)
        .await;
    assert!(matches!(result, Err(RecipesServiceError::NotFavorited)));

    remove(&store, MarkKind::ShoppingCart)
        .execute(reader.id, recipe_id)
        .await
        .unwrap();
    let result = remove(&store, MarkKind::ShoppingCart)
        .execute(reader.id, recipe_id)
        .await;
    assert!(matches!(result, Err(RecipesServiceError::NotInShoppingCart)));
}

#[tokio::test]
async fn should_flag_marked_recipes_for_viewer_only() {
    let store = MemoryStore::new();
    let recipe_id = seeded_recipe(&store).await;
    let reader = store.add_user("reader");
    add(&store, MarkKind::ShoppingCart)
        .execute(reader.id, recipe_id)
        .await
        .unwrap();

    let mine = store
        .get_usecase()
        .execute(Some(reader.id), recipe_id)
        .await
        .unwrap();
    assert!(mine.is_in_shopping_cart);
    assert!(!mine.is_favorited);

    let anonymous = store.get_usecase().execute(None, recipe_id).await.unwrap();
    assert!(!anonymous.is_in_shopping_cart);
}
