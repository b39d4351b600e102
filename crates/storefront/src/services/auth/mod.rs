//! Authentication service.
//!
//! Answers "who is this visitor and what may they do" from the session
//! store alone. There is no token expiry check; a session is authenticated
//! for as long as both tokens are present.

mod error;

pub use error::AuthError;

use emporium_core::Role;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde::de::DeserializeOwned;

use crate::api::ApiClient;
use crate::api::types::LoginResponse;
use crate::models::{CustomerProfile, SessionUser, session_keys};
use crate::routes::paths;
use crate::services::session_store::SessionStore;

/// Authentication service over any [`SessionStore`].
#[derive(Debug, Clone)]
pub struct AuthService<S> {
    store: S,
}

impl<S: SessionStore> AuthService<S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read a non-empty value. Backend failures read as absent.
    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read session key");
                None
            }
        }
    }

    /// Read and parse a JSON value. Malformed values read as absent.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Ignoring malformed session value");
                None
            }
        }
    }

    /// True iff both an access token and a refresh token are present.
    pub async fn is_authenticated(&self) -> bool {
        self.read(session_keys::ACCESS_TOKEN).await.is_some()
            && self.read(session_keys::REFRESH_TOKEN).await.is_some()
    }

    /// The stored user, if present and well-formed.
    pub async fn current_user(&self) -> Option<SessionUser> {
        self.read_json(session_keys::USER).await
    }

    /// The stored customer profile, if present and well-formed.
    pub async fn customer_profile(&self) -> Option<CustomerProfile> {
        self.read_json(session_keys::CUSTOMER_PROFILE).await
    }

    /// Whether the stored user's role list contains exactly `role`.
    pub async fn has_role(&self, role: &str) -> bool {
        self.current_user()
            .await
            .is_some_and(|user| user.roles.iter().any(|r| r == role))
    }

    pub async fn is_admin(&self) -> bool {
        self.has_role(Role::Admin.as_str()).await
    }

    pub async fn refresh_token(&self) -> Option<SecretString> {
        self.read(session_keys::REFRESH_TOKEN)
            .await
            .map(SecretString::from)
    }

    /// Persist a fresh login.
    ///
    /// Any previous profile is removed when the login carries none.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the store cannot be written.
    pub async fn store_login(&self, login: &LoginResponse) -> Result<(), AuthError> {
        self.store
            .set(session_keys::ACCESS_TOKEN, &login.access_token)
            .await?;
        self.store
            .set(session_keys::REFRESH_TOKEN, &login.refresh_token)
            .await?;
        self.store
            .set(session_keys::USER, &serde_json::to_string(&login.user)?)
            .await?;

        match &login.customer_profile {
            Some(profile) => {
                self.store
                    .set(
                        session_keys::CUSTOMER_PROFILE,
                        &serde_json::to_string(profile)?,
                    )
                    .await?;
            }
            None => self.store.remove(session_keys::CUSTOMER_PROFILE).await?,
        }

        Ok(())
    }

    /// Authenticate against the backend and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the backend answers
    /// 400/401/403, `AuthError::Api` for any other backend failure, and
    /// `AuthError::Session` if the session cannot be written.
    pub async fn login(
        &self,
        api: &ApiClient,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionUser, AuthError> {
        let response = api.login(email, password).await.map_err(|e| match e.status() {
            Some(StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                AuthError::InvalidCredentials
            }
            _ => AuthError::Api(e),
        })?;

        self.store_login(&response).await?;
        tracing::info!(email = %response.user.email, "Customer logged in");
        Ok(response.user)
    }

    /// End the session.
    ///
    /// The remote logout is best effort: it is only attempted when a refresh
    /// token exists, and its failure is logged and otherwise ignored. The
    /// local store is cleared regardless. Returns where to redirect.
    pub async fn logout(&self, api: &ApiClient) -> &'static str {
        if let Some(refresh_token) = self.refresh_token().await
            && let Err(e) = api.logout(&refresh_token).await
        {
            tracing::warn!(error = %e, "Remote logout failed; clearing local session anyway");
        }

        if let Err(e) = self.store.clear().await {
            tracing::error!(error = %e, "Failed to clear session store; removing keys one by one");
            for key in session_keys::ALL {
                if let Err(e) = self.store.remove(key).await {
                    tracing::error!(key, error = %e, "Failed to remove session key");
                }
            }
        }

        paths::LOGIN
    }
}
