use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::image::DecodedImage;
use crate::domain::repository::MediaStorage;
use crate::error::RecipesServiceError;

const RECIPE_IMAGE_DIR: &str = "recipes";

/// Stores recipe images on the local filesystem under `root`.
#[derive(Clone)]
pub struct FsMediaStorage {
    pub root: PathBuf,
    pub base_url: String,
}

impl MediaStorage for FsMediaStorage {
    async fn save_image(&self, image: &DecodedImage) -> Result<String, RecipesServiceError> {
        let dir = self.root.join(RECIPE_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create media directory {}", dir.display()))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), image.extension);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("write image {}", path.display()))?;
        Ok(format!("{RECIPE_IMAGE_DIR}/{file_name}"))
    }

    async fn remove(&self, path: &str) -> Result<(), RecipesServiceError> {
        let full = self.root.join(path.trim_start_matches('/'));
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove image {}", full.display()))
                .into()),
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
