//! User domain types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a username.
pub const USERNAME_MAX_LEN: usize = 150;

/// Username reserved for the `/users/me` route.
pub const RESERVED_USERNAME: &str = "me";

/// User permission level.
///
/// Wire format: `u8` (0 = User, 1 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User = 0,
    Admin = 1,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::User),
            1 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Reasons a username is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("username must not be empty")]
    Empty,
    #[error("username must be at most {USERNAME_MAX_LEN} characters")]
    TooLong,
    #[error("username \"me\" is reserved")]
    Reserved,
    #[error("username may contain only letters, digits and @/./+/-/_")]
    InvalidCharacter,
}

/// Validate a username: letters, digits and `@.+-_`, 1-150 chars.
/// Reserved: "me" in any letter case.
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    if username.is_empty() {
        return Err(UsernameError::Empty);
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(UsernameError::TooLong);
    }
    if username.eq_ignore_ascii_case(RESERVED_USERNAME) {
        return Err(UsernameError::Reserved);
    }
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '@' | '.' | '+' | '-'));
    if !valid {
        return Err(UsernameError::InvalidCharacter);
    }
    Ok(())
}
