//! Mock identity helpers for router tests.
//!
//! Services behind the gateway receive `x-pantry-user-id` + `x-pantry-user-role`
//! headers. `MockAuth` builds those headers directly so no gateway or token is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use pantry_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use pantry_domain::user::UserRole;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn user() -> Self {
        Self::new(Uuid::now_v7(), UserRole::User)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Admin)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_str(&self.role.as_u8().to_string()).unwrap(),
        );
        map
    }
}
