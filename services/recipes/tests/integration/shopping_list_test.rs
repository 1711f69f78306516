use pantry_recipes::domain::repository::RecipeMarkRepository;
use pantry_recipes::domain::shopping_list::render;
use pantry_recipes::domain::types::MarkKind;
use pantry_recipes::usecase::shopping_list::BuildShoppingListUseCase;

use crate::helpers::{MemoryStore, MockMedia, amount, recipe_payload};

fn listing(store: &MemoryStore) -> BuildShoppingListUseCase<MemoryStore> {
    BuildShoppingListUseCase {
        repo: store.clone(),
    }
}

#[tokio::test]
async fn should_aggregate_cart_across_recipes() {
    let store = MemoryStore::new();
    let a = store.add_user("alice");
    let b = store.add_user("bob");
    let tag = store.add_tag("breakfast");
    let flour = store.add_ingredient("flour", "g");
    let egg = store.add_ingredient("egg", "pcs");
    let create = store.create_usecase(MockMedia::new());
    let carts = store.marks(MarkKind::ShoppingCart);

    let r1 = create
        .execute(
            a.id,
            recipe_payload("Pancakes", &[&tag], vec![amount(&flour, 200), amount(&egg, 2)]),
        )
        .await
        .unwrap();
    carts.add(b.id, r1).await.unwrap();

    let items = listing(&store).execute(b.id).await.unwrap();
    let got: Vec<(&str, i64, &str)> = items
        .iter()
        .map(|i| (i.name.as_str(), i.total_amount, i.measurement_unit.as_str()))
        .collect();
    assert_eq!(got, vec![("egg", 2, "pcs"), ("flour", 200, "g")]);

    let r2 = create
        .execute(a.id, recipe_payload("Roux", &[&tag], vec![amount(&flour, 100)]))
        .await
        .unwrap();
    carts.add(b.id, r2).await.unwrap();

    let items = listing(&store).execute(b.id).await.unwrap();
    assert_eq!(render(&items), "egg - 2 pcs\nflour - 300 g\n");
}

#[tokio::test]
async fn should_not_depend_on_cart_insertion_order() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let first = store.add_user("first");
    let second = store.add_user("second");
    let tag = store.add_tag("dinner");
    let salt = store.add_ingredient("salt", "g");
    let water = store.add_ingredient("water", "ml");
    let create = store.create_usecase(MockMedia::new());
    let carts = store.marks(MarkKind::ShoppingCart);

    let soup = create
        .execute(
            author.id,
            recipe_payload("Soup", &[&tag], vec![amount(&water, 500), amount(&salt, 5)]),
        )
        .await
        .unwrap();
    let brine = create
        .execute(
            author.id,
            recipe_payload("Brine", &[&tag], vec![amount(&salt, 30), amount(&water, 1000)]),
        )
        .await
        .unwrap();

    carts.add(first.id, soup).await.unwrap();
    carts.add(first.id, brine).await.unwrap();
    carts.add(second.id, brine).await.unwrap();
    carts.add(second.id, soup).await.unwrap();

    let a = listing(&store).execute(first.id).await.unwrap();
    let b = listing(&store).execute(second.id).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(render(&a), "salt - 35 g\nwater - 1500 ml\n");
}

#[tokio::test]
async fn should_return_empty_list_for_empty_cart() {
    let store = MemoryStore::new();
    let user = store.add_user("nobody");
    let items = listing(&store).execute(user.id).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(render(&items), "");
}
