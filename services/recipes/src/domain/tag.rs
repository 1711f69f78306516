use crate::error::RecipesServiceError;

pub const TAG_NAME_MAX_LEN: usize = 200;

/// Tag submitted by an admin.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl NewTag {
    pub fn validate(&self) -> Result<(), RecipesServiceError> {
        if self.name.trim().is_empty() || self.name.chars().count() > TAG_NAME_MAX_LEN {
            return Err(RecipesServiceError::InvalidTagName);
        }
        if !is_hex_color(&self.color) {
            return Err(RecipesServiceError::InvalidTagColor);
        }
        if !is_slug(&self.slug) {
            return Err(RecipesServiceError::InvalidTagSlug);
        }
        Ok(())
    }
}

/// `#RRGGBB`
fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color
            .strip_prefix('#')
            .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// `[-a-zA-Z0-9_]+`, at most 200 chars.
fn is_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= TAG_NAME_MAX_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
