use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use pantry_domain::pagination::{Page, PageRequest};
use pantry_domain::user::{UserRole, validate_username};

use crate::domain::repository::{FollowRepository, UserRepository};
use crate::domain::types::{User, UserView};
use crate::domain::user::{hash_password, validate_email, validate_name, verify_password};
use crate::error::RecipesServiceError;
use crate::usecase::follow::followed_authors;

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct RegisterUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<UserView, RecipesServiceError> {
        validate_email(&input.email)?;
        validate_username(&input.username)?;
        validate_name("first_name", &input.first_name)?;
        validate_name("last_name", &input.last_name)?;
        if input.password.is_empty() {
            return Err(RecipesServiceError::EmptyPassword("password"));
        }

        let user = User {
            id: Uuid::now_v7(),
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash: hash_password(&input.password)?,
            role: UserRole::User.as_u8(),
            created_at: Utc::now(),
        };
        self.repo.create(&user).await?;
        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(UserView::new(user, false))
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> GetUserUseCase<U, F> {
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        id: Uuid,
    ) -> Result<UserView, RecipesServiceError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        let followed = followed_authors(&self.follows, viewer, &[id]).await?;
        Ok(UserView::new(user, followed.contains(&id)))
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> ListUsersUseCase<U, F> {
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<UserView>, RecipesServiceError> {
        let users = self.users.list(page).await?;
        let ids: Vec<Uuid> = users.results.iter().map(|u| u.id).collect();
        let followed = followed_authors(&self.follows, viewer, &ids).await?;
        Ok(users.map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserView::new(user, is_subscribed)
        }))
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

pub struct SetPasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct SetPasswordUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SetPasswordUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: SetPasswordInput,
    ) -> Result<(), RecipesServiceError> {
        if input.new_password.is_empty() {
            return Err(RecipesServiceError::EmptyPassword("new_password"));
        }
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        if !verify_password(&input.current_password, &user.password_hash)? {
            return Err(RecipesServiceError::InvalidPassword);
        }
        let password_hash = hash_password(&input.new_password)?;
        self.repo.update_password(user_id, &password_hash).await?;
        info!(%user_id, "password changed");
        Ok(())
    }
}
