use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use pantry_domain::pagination::{Page, PageRequest};
use pantry_recipes::domain::image::DecodedImage;
use pantry_recipes::domain::recipe::RecipeWriteModel;
use pantry_recipes::domain::repository::{
    FollowRepository, IngredientRepository, MediaStorage, RecipeMarkRepository, RecipeRepository,
    ShoppingListRepository, TagRepository, UserRepository,
};
use pantry_recipes::domain::shopping_list::CartLine;
use pantry_recipes::domain::tag::NewTag;
use pantry_recipes::domain::types::{
    Ingredient, IngredientAmount, MarkKind, Recipe, RecipeDraft, RecipeFilter, RecipeIngredient,
    RecipeSummary, Tag, User,
};
use pantry_recipes::error::RecipesServiceError;
use pantry_recipes::usecase::recipe::{
    CreateRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase, RecipePresenter,
    UpdateRecipeUseCase,
};

pub const MEDIA_URL: &str = "/media/";

// ── MemoryStore ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoredRecipe {
    pub id: i32,
    pub author_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub follows: Vec<(Uuid, Uuid)>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
    pub recipes: Vec<StoredRecipe>,
    pub favorites: Vec<(Uuid, i32)>,
    pub carts: Vec<(Uuid, i32)>,
    pub next_recipe_id: i32,
}

/// In-memory stand-in for every repository. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str) -> User {
        let user = User {
            id: Uuid::now_v7(),
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            password_hash: String::new(),
            role: 0,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn add_tag(&self, slug: &str) -> Tag {
        let mut tables = self.tables.lock().unwrap();
        let tag = Tag {
            id: tables.tags.len() as i32 + 1,
            name: slug.to_owned(),
            color: format!("#{:06X}", tables.tags.len() + 1),
            slug: slug.to_owned(),
        };
        tables.tags.push(tag.clone());
        tag
    }

    pub fn add_ingredient(&self, name: &str, measurement_unit: &str) -> Ingredient {
        let mut tables = self.tables.lock().unwrap();
        let ingredient = Ingredient {
            id: tables.ingredients.len() as i32 + 1,
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        };
        tables.ingredients.push(ingredient.clone());
        ingredient
    }

    pub fn marks(&self, kind: MarkKind) -> MemoryMarks {
        MemoryMarks {
            store: self.clone(),
            kind,
        }
    }

    pub fn presenter(&self) -> RecipePresenter<MemoryStore, MemoryMarks, MemoryMarks> {
        RecipePresenter {
            follows: self.clone(),
            favorites: self.marks(MarkKind::Favorite),
            carts: self.marks(MarkKind::ShoppingCart),
            media_url: MEDIA_URL.to_owned(),
        }
    }

    pub fn create_usecase(
        &self,
        media: MockMedia,
    ) -> CreateRecipeUseCase<MemoryStore, MemoryStore, MemoryStore, MockMedia> {
        CreateRecipeUseCase {
            recipes: self.clone(),
            tags: self.clone(),
            ingredients: self.clone(),
            media,
        }
    }

    pub fn update_usecase(
        &self,
        media: MockMedia,
    ) -> UpdateRecipeUseCase<MemoryStore, MemoryStore, MemoryStore, MockMedia> {
        UpdateRecipeUseCase {
            recipes: self.clone(),
            tags: self.clone(),
            ingredients: self.clone(),
            media,
        }
    }

    pub fn get_usecase(&self) -> GetRecipeUseCase<MemoryStore, MemoryStore, MemoryMarks, MemoryMarks> {
        GetRecipeUseCase {
            recipes: self.clone(),
            presenter: self.presenter(),
        }
    }

    pub fn list_usecase(
        &self,
    ) -> ListRecipesUseCase<MemoryStore, MemoryStore, MemoryMarks, MemoryMarks> {
        ListRecipesUseCase {
            recipes: self.clone(),
            presenter: self.presenter(),
        }
    }

    /// Ingredient lines stored for a recipe, as `(ingredient_id, amount)`.
    pub fn ingredient_rows(&self, recipe_id: i32) -> Vec<(i32, i32)> {
        self.tables
            .lock()
            .unwrap()
            .recipes
            .iter()
            .filter(|r| r.id == recipe_id)
            .flat_map(|r| r.ingredients.iter().map(|l| (l.ingredient_id, l.amount)))
            .collect()
    }

    pub fn recipe_count(&self) -> usize {
        self.tables.lock().unwrap().recipes.len()
    }

    fn hydrate(tables: &Tables, stored: &StoredRecipe) -> Option<Recipe> {
        let author = tables.users.iter().find(|u| u.id == stored.author_id)?.clone();
        let tags = stored
            .tag_ids
            .iter()
            .filter_map(|id| tables.tags.iter().find(|t| t.id == *id).cloned())
            .collect();
        let ingredients = stored
            .ingredients
            .iter()
            .filter_map(|line| {
                tables
                    .ingredients
                    .iter()
                    .find(|i| i.id == line.ingredient_id)
                    .map(|i| RecipeIngredient {
                        id: i.id,
                        name: i.name.clone(),
                        measurement_unit: i.measurement_unit.clone(),
                        amount: line.amount,
                    })
            })
            .collect();
        Some(Recipe {
            id: stored.id,
            author,
            name: stored.name.clone(),
            image: stored.image.clone(),
            text: stored.text.clone(),
            cooking_time: stored.cooking_time,
            created_at: stored.created_at,
            tags,
            ingredients,
        })
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let page = page.clamped();
    let count = items.len() as u64;
    let results = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    Page::new(count, results)
}

impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: &User) -> Result<(), RecipesServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(RecipesServiceError::UserAlreadyExists);
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, RecipesServiceError> {
        let mut users = self.tables.lock().unwrap().users.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(paginate(users, page))
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), RecipesServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_owned();
        }
        Ok(())
    }
}

impl FollowRepository for MemoryStore {
    async fn add(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.follows.contains(&(user_id, author_id)) {
            return Ok(false);
        }
        tables.follows.push((user_id, author_id));
        Ok(true)
    }

    async fn remove(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.follows.len();
        tables.follows.retain(|pair| *pair != (user_id, author_id));
        Ok(tables.follows.len() < before)
    }

    async fn following_among(
        &self,
        user_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .follows
            .iter()
            .filter(|(u, a)| *u == user_id && author_ids.contains(a))
            .map(|(_, a)| *a)
            .collect())
    }

    async fn list_authors(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<User>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut authors: Vec<User> = tables
            .users
            .iter()
            .filter(|u| tables.follows.contains(&(user_id, u.id)))
            .cloned()
            .collect();
        authors.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(paginate(authors, page))
    }
}

impl TagRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        Ok(self.tables.lock().unwrap().tags.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tags
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn create(&self, tag: &NewTag) -> Result<Tag, RecipesServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .tags
            .iter()
            .any(|t| t.name == tag.name || t.color == tag.color || t.slug == tag.slug)
        {
            return Err(RecipesServiceError::TagAlreadyExists);
        }
        let created = Tag {
            id: tables.tags.len() as i32 + 1,
            name: tag.name.clone(),
            color: tag.color.clone(),
            slug: tag.slug.clone(),
        };
        tables.tags.push(created.clone());
        Ok(created)
    }
}

impl IngredientRepository for MemoryStore {
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let prefix = name_prefix.map(str::to_lowercase);
        let mut ingredients: Vec<Ingredient> = self
            .tables
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .filter(|i| {
                prefix
                    .as_deref()
                    .is_none_or(|p| i.name.to_lowercase().starts_with(p))
            })
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .ingredients
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }
}

impl RecipeRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .recipes
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| Self::hydrate(&tables, r)))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut matching: Vec<Recipe> = tables
            .recipes
            .iter()
            .filter(|r| filter.author_id.is_none_or(|a| r.author_id == a))
            .filter(|r| {
                filter.tags.is_empty()
                    || tables
                        .tags
                        .iter()
                        .any(|t| r.tag_ids.contains(&t.id) && filter.tags.contains(&t.slug))
            })
            .filter(|r| {
                filter
                    .favorited_by
                    .is_none_or(|u| tables.favorites.contains(&(u, r.id)))
            })
            .filter(|r| {
                filter
                    .in_cart_of
                    .is_none_or(|u| tables.carts.contains(&(u, r.id)))
            })
            .filter_map(|r| Self::hydrate(&tables, r))
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(paginate(matching, page))
    }

    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, RecipesServiceError> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_recipe_id += 1;
        let id = tables.next_recipe_id;
        tables.recipes.push(StoredRecipe {
            id,
            author_id,
            name: draft.name.clone(),
            image: draft.image.clone(),
            text: draft.text.clone(),
            cooking_time: draft.cooking_time,
            created_at: Utc::now(),
            tag_ids: draft.tag_ids.clone(),
            ingredients: draft.ingredients.clone(),
        });
        Ok(id)
    }

    async fn update(&self, id: i32, draft: &RecipeDraft) -> Result<(), RecipesServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let recipe = tables
            .recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        recipe.name = draft.name.clone();
        recipe.text = draft.text.clone();
        recipe.cooking_time = draft.cooking_time;
        if draft.image.is_some() {
            recipe.image = draft.image.clone();
        }
        recipe.tag_ids = draft.tag_ids.clone();
        recipe.ingredients = draft.ingredients.clone();
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, RecipesServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.recipes.len();
        tables.recipes.retain(|r| r.id != id);
        tables.favorites.retain(|(_, r)| *r != id);
        tables.carts.retain(|(_, r)| *r != id);
        Ok(tables.recipes.len() < before)
    }

    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut summaries: Vec<RecipeSummary> = tables
            .recipes
            .iter()
            .filter(|r| r.author_id == author_id)
            .map(|r| RecipeSummary {
                id: r.id,
                name: r.name.clone(),
                image: r.image.clone(),
                cooking_time: r.cooking_time,
            })
            .collect();
        summaries.sort_by(|a, b| b.id.cmp(&a.id));
        if let Some(limit) = limit {
            summaries.truncate(limit as usize);
        }
        Ok(summaries)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.recipes.iter().filter(|r| r.author_id == author_id).count() as u64)
    }
}

impl ShoppingListRepository for MemoryStore {
    async fn cart_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, RecipesServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut lines = Vec::new();
        for (_, recipe_id) in tables.carts.iter().filter(|(u, _)| *u == user_id) {
            let Some(recipe) = tables.recipes.iter().find(|r| r.id == *recipe_id) else {
                continue;
            };
            for line in &recipe.ingredients {
                if let Some(ingredient) = tables
                    .ingredients
                    .iter()
                    .find(|i| i.id == line.ingredient_id)
                {
                    lines.push(CartLine {
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        amount: i64::from(line.amount),
                    });
                }
            }
        }
        Ok(lines)
    }
}

// ── MemoryMarks ──────────────────────────────────────────────────────────────

/// Favorites or shopping-cart rows of a [`MemoryStore`], selected by `kind`.
#[derive(Clone)]
pub struct MemoryMarks {
    pub store: MemoryStore,
    pub kind: MarkKind,
}

impl MemoryMarks {
    fn with_rows<T>(&self, f: impl FnOnce(&mut Vec<(Uuid, i32)>) -> T) -> T {
        let mut tables = self.store.tables.lock().unwrap();
        match self.kind {
            MarkKind::Favorite => f(&mut tables.favorites),
            MarkKind::ShoppingCart => f(&mut tables.carts),
        }
    }

    pub fn rows(&self) -> Vec<(Uuid, i32)> {
        self.with_rows(|rows| rows.clone())
    }
}

impl RecipeMarkRepository for MemoryMarks {
    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        Ok(self.with_rows(|rows| {
            if rows.contains(&(user_id, recipe_id)) {
                false
            } else {
                rows.push((user_id, recipe_id));
                true
            }
        }))
    }

    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        Ok(self.with_rows(|rows| {
            let before = rows.len();
            rows.retain(|pair| *pair != (user_id, recipe_id));
            rows.len() < before
        }))
    }

    async fn marked_among(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, RecipesServiceError> {
        Ok(self.with_rows(|rows| {
            rows.iter()
                .filter(|(u, r)| *u == user_id && recipe_ids.contains(r))
                .map(|(_, r)| *r)
                .collect()
        }))
    }
}

// ── MockMedia ────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMedia {
    pub saved: Arc<Mutex<Vec<String>>>,
    pub removed: Arc<Mutex<Vec<String>>>,
}

impl MockMedia {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MediaStorage for MockMedia {
    async fn save_image(&self, image: &DecodedImage) -> Result<String, RecipesServiceError> {
        let path = format!("recipes/{}.{}", Uuid::new_v4(), image.extension);
        self.saved.lock().unwrap().push(path.clone());
        Ok(path)
    }

    async fn remove(&self, path: &str) -> Result<(), RecipesServiceError> {
        self.removed.lock().unwrap().push(path.to_owned());
        Ok(())
    }

    fn base_url(&self) -> &str {
        MEDIA_URL
    }
}

// ── Payloads ─────────────────────────────────────────────────────────────────

/// 1x1 transparent PNG.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn amount(ingredient: &Ingredient, amount: i32) -> IngredientAmount {
    IngredientAmount {
        ingredient_id: ingredient.id,
        amount,
    }
}

pub fn recipe_payload(
    name: &str,
    tags: &[&Tag],
    ingredients: Vec<IngredientAmount>,
) -> RecipeWriteModel {
    RecipeWriteModel {
        name: Some(name.to_owned()),
        text: Some(format!("How to make {name}.")),
        cooking_time: Some(30),
        image: None,
        tags: Some(tags.iter().map(|t| t.id).collect()),
        ingredients: Some(ingredients),
    }
}
