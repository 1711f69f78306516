use tracing::info;

use crate::domain::repository::TagRepository;
use crate::domain::tag::NewTag;
use crate::domain::types::Tag;
use crate::error::RecipesServiceError;

// ── ListTags ─────────────────────────────────────────────────────────────────

pub struct ListTagsUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> ListTagsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        self.repo.list().await
    }
}

// ── GetTag ───────────────────────────────────────────────────────────────────

pub struct GetTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> GetTagUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Tag, RecipesServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::TagNotFound)
    }
}

// ── CreateTag ────────────────────────────────────────────────────────────────

pub struct CreateTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> CreateTagUseCase<R> {
    pub async fn execute(&self, tag: NewTag) -> Result<Tag, RecipesServiceError> {
        tag.validate()?;
        let tag = self.repo.create(&tag).await?;
        info!(tag_id = tag.id, slug = %tag.slug, "tag created");
        Ok(tag)
    }
}
