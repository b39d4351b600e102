//! Session-related types.
//!
//! Types stored in the session for authentication state.

use emporium_core::UserId;
use serde::{Deserialize, Serialize};

/// Session-stored user identity, kept as JSON under [`keys::USER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    /// Exact role strings, e.g. `ROLE_ADMIN`.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl SessionUser {
    /// Name if known, otherwise the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Session keys for authentication data.
///
/// Values are plain strings; `USER` and `CUSTOMER_PROFILE` hold serialized
/// JSON and are parsed on read.
pub mod keys {
    /// Key for the backend access token.
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Key for the backend refresh token.
    pub const REFRESH_TOKEN: &str = "refreshToken";

    /// Key for the serialized [`super::SessionUser`].
    pub const USER: &str = "user";

    /// Key for the serialized [`crate::models::CustomerProfile`].
    pub const CUSTOMER_PROFILE: &str = "customerProfile";

    /// Every key the storefront writes.
    pub const ALL: [&str; 4] = [ACCESS_TOKEN, REFRESH_TOKEN, USER, CUSTOMER_PROFILE];
}
