/// Recipes service configuration loaded from environment variables.
#[derive(Debug)]
pub struct RecipesConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `RECIPES_PORT`.
    pub recipes_port: u16,
    /// Directory uploaded images are written to (default `./media`). Env var: `MEDIA_ROOT`.
    pub media_root: String,
    /// Public URL prefix for stored images (default `/media/`). Env var: `MEDIA_URL`.
    pub media_url: String,
}

impl RecipesConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            recipes_port: std::env::var("RECIPES_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
            media_root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_owned()),
            media_url: std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_owned()),
        }
    }
}
