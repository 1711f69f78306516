use std::path::PathBuf;

use sea_orm::Database;
use tracing::info;

use pantry_recipes::config::RecipesConfig;
use pantry_recipes::router::build_router;
use pantry_recipes::state::AppState;

#[tokio::main]
async fn main() {
    pantry_core::tracing::init_tracing();

    let config = RecipesConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        media_root: PathBuf::from(config.media_root),
        media_url: config.media_url,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.recipes_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("recipes service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
