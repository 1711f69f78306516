use axum::{
    Router,
    routing::{get, post},
};

use pantry_core::error::route_not_found;
use pantry_core::health::{healthz, readyz};
use pantry_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    ingredient::{get_ingredient, list_ingredients},
    mark::{
        add_favorite, add_to_shopping_cart, download_shopping_cart, remove_favorite,
        remove_from_shopping_cart,
    },
    recipe::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe},
    subscription::{list_subscriptions, subscribe, unsubscribe},
    tag::{create_tag, get_tag, list_tags},
    user::{get_me, get_user, list_users, register_user, set_password},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/api/users", get(list_users).post(register_user))
        .route("/api/users/me", get(get_me))
        .route("/api/users/set_password", post(set_password))
        .route("/api/users/{id}", get(get_user))
        // Subscriptions
        .route("/api/users/subscriptions", get(list_subscriptions))
        .route("/api/users/{id}/subscribe", post(subscribe).delete(unsubscribe))
        // Tags
        .route("/api/tags", get(list_tags).post(create_tag))
        .route("/api/tags/{id}", get(get_tag))
        // Ingredients
        .route("/api/ingredients", get(list_ingredients))
        .route("/api/ingredients/{id}", get(get_ingredient))
        // Recipes
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        // Marks
        .route(
            "/api/recipes/{id}/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart",
            post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        )
        .route(
            "/api/recipes/download_shopping_cart",
            get(download_shopping_cart),
        )
        .fallback(route_not_found)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
