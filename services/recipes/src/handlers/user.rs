use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use pantry_auth_types::identity::IdentityHeaders;
use pantry_domain::pagination::{Page, PageRequest};

use crate::domain::types::UserView;
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::user::{
    GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase, SetPasswordInput,
    SetPasswordUseCase,
};

// ── POST /api/users ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserView>), RecipesServiceError> {
    let usecase = RegisterUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(RegisterUserInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<UserView>>, RecipesServiceError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let users = usecase
        .execute(identity.map(|i| i.user_id), page.clamped())
        .await?;
    Ok(Json(users))
}

// ── GET /api/users/me ────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserView>, RecipesServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let user = usecase
        .execute(Some(identity.user_id), identity.user_id)
        .await?;
    Ok(Json(user))
}

// ── GET /api/users/{id} ──────────────────────────────────────────────────────

pub async fn get_user(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, RecipesServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let user = usecase.execute(identity.map(|i| i.user_id), id).await?;
    Ok(Json(user))
}

// ── POST /api/users/set_password ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn set_password(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<SetPasswordRequest>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = SetPasswordUseCase {
        repo: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            SetPasswordInput {
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
