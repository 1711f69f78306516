use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, Query};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    Statement, TransactionTrait,
};
use uuid::Uuid;

use pantry_core::sea_ext::{DbErrExt, flatten_transaction_err};
use pantry_domain::pagination::{Page, PageRequest};
use pantry_recipes_schema::{
    favorites, follows, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts,
    tags, users,
};

use crate::domain::repository::{
    FollowRepository, IngredientRepository, RecipeMarkRepository, RecipeRepository,
    ShoppingListRepository, TagRepository, UserRepository,
};
use crate::domain::shopping_list::CartLine;
use crate::domain::tag::NewTag;
use crate::domain::types::{
    Ingredient, MarkKind, Recipe, RecipeDraft, RecipeFilter, RecipeIngredient, RecipeSummary,
    Tag, User,
};
use crate::error::RecipesServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), RecipesServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(i16::from(user.role)),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => Err(RecipesServiceError::UserAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, RecipesServiceError> {
        let query = users::Entity::find().order_by_asc(users::Column::Username);
        paginate_users(&self.db, query, page).await
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), RecipesServiceError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user password")?;
        Ok(())
    }
}

async fn paginate_users(
    db: &DatabaseConnection,
    query: Select<users::Entity>,
    page: PageRequest,
) -> Result<Page<User>, RecipesServiceError> {
    let page = page.clamped();
    let count = query.clone().count(db).await.context("count users")?;
    let models = query
        .offset(page.offset())
        .limit(u64::from(page.limit))
        .all(db)
        .await
        .context("list users")?;
    Ok(Page::new(
        count,
        models.into_iter().map(user_from_model).collect(),
    ))
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password_hash,
        role: u8::try_from(model.role).unwrap_or_default(),
        created_at: model.created_at,
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn add(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError> {
        let result = follows::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if e.is_unique_violation() => Ok(false),
            Err(e) if e.is_foreign_key_violation() => Err(RecipesServiceError::UserNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("insert follow").into()),
        }
    }

    async fn remove(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::UserId.eq(user_id))
            .filter(follows::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .context("delete follow")?;
        Ok(result.rows_affected > 0)
    }

    async fn following_among(
        &self,
        user_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RecipesServiceError> {
        let ids: Vec<Uuid> = follows::Entity::find()
            .select_only()
            .column(follows::Column::AuthorId)
            .filter(follows::Column::UserId.eq(user_id))
            .filter(follows::Column::AuthorId.is_in(author_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list followed authors among ids")?;
        Ok(ids.into_iter().collect())
    }

    async fn list_authors(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<User>, RecipesServiceError> {
        let query = users::Entity::find()
            .filter(
                users::Column::Id.in_subquery(
                    Query::select()
                        .column(follows::Column::AuthorId)
                        .from(follows::Entity)
                        .and_where(follows::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(users::Column::Username);
        paginate_users(&self.db, query, page).await
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RecipesServiceError> {
        let models = tags::Entity::find()
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find tags by ids")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn create(&self, tag: &NewTag) -> Result<Tag, RecipesServiceError> {
        let result = tags::ActiveModel {
            name: Set(tag.name.clone()),
            color: Set(tag.color.clone()),
            slug: Set(tag.slug.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => Ok(tag_from_model(model)),
            Err(e) if e.is_unique_violation() => Err(RecipesServiceError::TagAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create tag").into()),
        }
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let mut query = ingredients::Entity::find()
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::MeasurementUnit);
        if let Some(prefix) = name_prefix {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(ingredients::Column::Name))).like(pattern),
            );
        }
        let models = query.all(&self.db).await.context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find ingredients by ids")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl DbRecipeRepository {
    /// Attach tags and ingredient lines to recipe rows, two queries for the whole batch.
    async fn hydrate(
        &self,
        rows: Vec<(recipes::Model, Option<users::Model>)>,
    ) -> Result<Vec<Recipe>, RecipesServiceError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<i32> = rows.iter().map(|(recipe, _)| recipe.id).collect();

        let tag_rows = recipe_tags::Entity::find()
            .filter(recipe_tags::Column::RecipeId.is_in(ids.iter().copied()))
            .find_also_related(tags::Entity)
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("load recipe tags")?;
        let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
        for (link, tag) in tag_rows {
            if let Some(tag) = tag {
                tags_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(tag_from_model(tag));
            }
        }

        let ingredient_rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(ids.iter().copied()))
            .find_also_related(ingredients::Entity)
            .order_by_asc(recipe_ingredients::Column::Id)
            .all(&self.db)
            .await
            .context("load recipe ingredients")?;
        let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
        for (line, ingredient) in ingredient_rows {
            if let Some(ingredient) = ingredient {
                ingredients_by_recipe
                    .entry(line.recipe_id)
                    .or_default()
                    .push(RecipeIngredient {
                        id: ingredient.id,
                        name: ingredient.name,
                        measurement_unit: ingredient.measurement_unit,
                        amount: line.amount,
                    });
            }
        }

        rows.into_iter()
            .map(|(model, author)| -> Result<Recipe, RecipesServiceError> {
                let author = author
                    .with_context(|| format!("recipe {} has no author", model.id))?;
                Ok(Recipe {
                    id: model.id,
                    author: user_from_model(author),
                    name: model.name,
                    image: model.image,
                    text: model.text,
                    cooking_time: model.cooking_time,
                    created_at: model.created_at,
                    tags: tags_by_recipe.remove(&model.id).unwrap_or_default(),
                    ingredients: ingredients_by_recipe.remove(&model.id).unwrap_or_default(),
                })
            })
            .collect()
    }
}

fn apply_filter(
    mut query: Select<recipes::Entity>,
    filter: &RecipeFilter,
) -> Select<recipes::Entity> {
    if let Some(author_id) = filter.author_id {
        query = query.filter(recipes::Column::AuthorId.eq(author_id));
    }
    if !filter.tags.is_empty() {
        query = query.filter(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                    .from(recipe_tags::Entity)
                    .inner_join(
                        tags::Entity,
                        Expr::col((tags::Entity, tags::Column::Id))
                            .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                    )
                    .and_where(
                        Expr::col((tags::Entity, tags::Column::Slug))
                            .is_in(filter.tags.iter().cloned()),
                    )
                    .to_owned(),
            ),
        );
    }
    if let Some(user_id) = filter.favorited_by {
        query = query.filter(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column(favorites::Column::RecipeId)
                    .from(favorites::Entity)
                    .and_where(favorites::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        );
    }
    if let Some(user_id) = filter.in_cart_of {
        query = query.filter(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column(shopping_carts::Column::RecipeId)
                    .from(shopping_carts::Entity)
                    .and_where(shopping_carts::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        );
    }
    query
}

/// Insert tag links and ingredient lines for `recipe_id`.
async fn insert_components<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    draft: &RecipeDraft,
) -> Result<(), DbErr> {
    if !draft.tag_ids.is_empty() {
        recipe_tags::Entity::insert_many(draft.tag_ids.iter().map(|&tag_id| {
            recipe_tags::ActiveModel {
                recipe_id: Set(recipe_id),
                tag_id: Set(tag_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    if !draft.ingredients.is_empty() {
        recipe_ingredients::Entity::insert_many(draft.ingredients.iter().map(|line| {
            recipe_ingredients::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(line.ingredient_id),
                amount: Set(line.amount),
                ..Default::default()
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    Ok(())
}

impl RecipeRepository for DbRecipeRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, RecipesServiceError> {
        let row = recipes::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.pop())
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesServiceError> {
        let page = page.clamped();
        let query = apply_filter(recipes::Entity::find(), filter);
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count recipes")?;
        let rows = query
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok(Page::new(count, self.hydrate(rows).await?))
    }

    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, RecipesServiceError> {
        let draft = draft.clone();
        let id = self
            .db
            .transaction::<_, i32, DbErr>(move |txn| {
                Box::pin(async move {
                    let recipe = recipes::ActiveModel {
                        author_id: Set(author_id),
                        name: Set(draft.name.clone()),
                        image: Set(draft.image.clone()),
                        text: Set(draft.text.clone()),
                        cooking_time: Set(draft.cooking_time),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    insert_components(txn, recipe.id, &draft).await?;
                    Ok(recipe.id)
                })
            })
            .await
            .map_err(flatten_transaction_err)
            .context("create recipe")?;
        Ok(id)
    }

    async fn update(&self, id: i32, draft: &RecipeDraft) -> Result<(), RecipesServiceError> {
        let draft = draft.clone();
        let result = self
            .db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let mut recipe = recipes::ActiveModel {
                        id: Set(id),
                        name: Set(draft.name.clone()),
                        text: Set(draft.text.clone()),
                        cooking_time: Set(draft.cooking_time),
                        ..Default::default()
                    };
                    if let Some(image) = &draft.image {
                        recipe.image = Set(Some(image.clone()));
                    }
                    recipe.update(txn).await?;

                    // Full replacement: the previous sets never survive an update.
                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    insert_components(txn, id, &draft).await?;
                    Ok(())
                })
            })
            .await
            .map_err(flatten_transaction_err);
        match result {
            Ok(()) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(RecipesServiceError::RecipeNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update recipe").into()),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, RecipesServiceError> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query
            .all(&self.db)
            .await
            .context("list recipe summaries by author")?;
        Ok(models
            .into_iter()
            .map(|model| RecipeSummary {
                id: model.id,
                name: model.name,
                image: model.image,
                cooking_time: model.cooking_time,
            })
            .collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RecipesServiceError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }
}

// ── Recipe mark repository ───────────────────────────────────────────────────

/// Favorites and shopping carts share one table shape; `kind` selects the table.
#[derive(Clone)]
pub struct DbRecipeMarkRepository {
    pub db: DatabaseConnection,
    pub kind: MarkKind,
}

impl RecipeMarkRepository for DbRecipeMarkRepository {
    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let result = match self.kind {
            MarkKind::Favorite => favorites::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
            MarkKind::ShoppingCart => shopping_carts::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
        };
        match result {
            Ok(()) => Ok(true),
            Err(e) if e.is_unique_violation() => Ok(false),
            Err(e) if e.is_foreign_key_violation() => Err(RecipesServiceError::RecipeNotFound),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("insert {} mark", self.kind.as_str()))
                .into()),
        }
    }

    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let result = match self.kind {
            MarkKind::Favorite => {
                favorites::Entity::delete_many()
                    .filter(favorites::Column::UserId.eq(user_id))
                    .filter(favorites::Column::RecipeId.eq(recipe_id))
                    .exec(&self.db)
                    .await
            }
            MarkKind::ShoppingCart => {
                shopping_carts::Entity::delete_many()
                    .filter(shopping_carts::Column::UserId.eq(user_id))
                    .filter(shopping_carts::Column::RecipeId.eq(recipe_id))
                    .exec(&self.db)
                    .await
            }
        }
        .with_context(|| format!("delete {} mark", self.kind.as_str()))?;
        Ok(result.rows_affected > 0)
    }

    async fn marked_among(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, RecipesServiceError> {
        let ids: Vec<i32> = match self.kind {
            MarkKind::Favorite => {
                favorites::Entity::find()
                    .select_only()
                    .column(favorites::Column::RecipeId)
                    .filter(favorites::Column::UserId.eq(user_id))
                    .filter(favorites::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                    .into_tuple()
                    .all(&self.db)
                    .await
            }
            MarkKind::ShoppingCart => {
                shopping_carts::Entity::find()
                    .select_only()
                    .column(shopping_carts::Column::RecipeId)
                    .filter(shopping_carts::Column::UserId.eq(user_id))
                    .filter(shopping_carts::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                    .into_tuple()
                    .all(&self.db)
                    .await
            }
        }
        .with_context(|| format!("list {} marks among ids", self.kind.as_str()))?;
        Ok(ids.into_iter().collect())
    }
}

// ── Shopping list ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShoppingListRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct CartLineRow {
    name: String,
    measurement_unit: String,
    total_amount: i64,
}

impl ShoppingListRepository for DbShoppingListRepository {
    async fn cart_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, RecipesServiceError> {
        let sql = r#"
            SELECT i.name, i.measurement_unit, SUM(ri.amount)::BIGINT AS total_amount
                FROM shopping_carts AS sc
                JOIN recipe_ingredients AS ri ON ri.recipe_id = sc.recipe_id
                JOIN ingredients AS i ON i.id = ri.ingredient_id
                WHERE sc.user_id = $1
                GROUP BY i.name, i.measurement_unit
                ORDER BY i.name
        "#;
        let rows = CartLineRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context("aggregate shopping cart lines")?;
        Ok(rows
            .into_iter()
            .map(|row| CartLine {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.total_amount,
            })
            .collect())
    }
}
