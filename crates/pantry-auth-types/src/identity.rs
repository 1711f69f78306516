//! Gateway-injected identity headers extractor.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::request::Parts;
use uuid::Uuid;

use pantry_core::error::AppError;
use pantry_domain::user::UserRole;

pub const USER_ID_HEADER: &str = "x-pantry-user-id";
pub const USER_ROLE_HEADER: &str = "x-pantry-user-role";

/// User identity injected by the gateway via `x-pantry-user-id` and `x-pantry-user-role`.
///
/// As a required extractor it rejects with [`AppError::Unauthorized`] (401, JSON body)
/// when the id header is absent or malformed.
/// As `Option<IdentityHeaders>` an absent id header yields `None` (anonymous caller),
/// while a malformed one is still rejected with 401.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl IdentityHeaders {
    pub fn is_admin(&self) -> bool {
        UserRole::from_u8(self.user_role) == Some(UserRole::Admin)
    }
}

/// Headers read synchronously so the returned future does not borrow `parts`.
enum RawIdentity {
    Absent,
    Invalid,
    Present(IdentityHeaders),
}

fn read_identity(parts: &Parts) -> RawIdentity {
    let Some(raw_id) = parts.headers.get(USER_ID_HEADER) else {
        return RawIdentity::Absent;
    };
    let user_id = raw_id
        .to_str()
        .ok()
        .and_then(|s| s.parse::<Uuid>().ok());
    // Role defaults to a regular user when the gateway omits it.
    let user_role = match parts.headers.get(USER_ROLE_HEADER) {
        None => Some(UserRole::User.as_u8()),
        Some(v) => v.to_str().ok().and_then(|s| s.parse::<u8>().ok()),
    };
    match (user_id, user_role) {
        (Some(user_id), Some(user_role)) => RawIdentity::Present(IdentityHeaders { user_id, user_role }),
        _ => RawIdentity::Invalid,
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Values are extracted up front and moved into a 'static future; an
    // `async fn` here would capture the `parts` lifetime.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let raw = read_identity(parts);
        async move {
            match raw {
                RawIdentity::Present(identity) => Ok(identity),
                RawIdentity::Absent | RawIdentity::Invalid => Err(AppError::Unauthorized),
            }
        }
    }
}

impl<S> OptionalFromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let raw = read_identity(parts);
        async move {
            match raw {
                RawIdentity::Present(identity) => Ok(Some(identity)),
                RawIdentity::Absent => Ok(None),
                RawIdentity::Invalid => Err(AppError::Unauthorized),
            }
        }
    }
}
