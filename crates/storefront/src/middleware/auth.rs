//! Route guard and session extractors.
//!
//! The guard runs on every request to a protected subtree and re-reads the
//! session each time; nothing is cached between requests.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use emporium_core::Role;
use tower_sessions::Session;

use crate::models::SessionUser;
use crate::routes::paths;
use crate::services::auth::AuthService;
use crate::services::session_store::SessionStore;

/// Outcome of checking a request against the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(&'static str),
}

/// Decide whether to render or where to redirect.
///
/// Unauthenticated visitors go to the login page; authenticated visitors
/// lacking `required_role` go home.
pub async fn evaluate<S: SessionStore>(
    auth: &AuthService<S>,
    required_role: Option<&str>,
) -> GuardDecision {
    if !auth.is_authenticated().await {
        return GuardDecision::Redirect(paths::LOGIN);
    }

    if let Some(role) = required_role
        && !auth.has_role(role).await
    {
        return GuardDecision::Redirect(paths::HOME);
    }

    GuardDecision::Render
}

/// Rejection when the session layer is missing from the stack.
#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        tracing::error!("Session extension missing; is the session layer installed?");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Extractor giving handlers an [`AuthService`] over the request's session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(SessionAuth(auth): SessionAuth) -> impl IntoResponse {
///     if auth.is_admin().await { "hello admin" } else { "hello" }
/// }
/// ```
pub struct SessionAuth(pub AuthService<Session>);

impl<S> FromRequestParts<S> for SessionAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection)?;

        Ok(Self(AuthService::new(session)))
    }
}

/// Who is browsing, for the page header.
///
/// Never rejects: without a session layer or a login this is an anonymous
/// visitor.
#[derive(Debug, Clone, Default)]
pub struct Visitor {
    pub user: Option<SessionUser>,
    pub is_admin: bool,
}

impl Visitor {
    /// Build from an auth service. A user without both tokens is anonymous.
    pub async fn load<S: SessionStore>(auth: &AuthService<S>) -> Self {
        if !auth.is_authenticated().await {
            return Self::default();
        }
        Self {
            user: auth.current_user().await,
            is_admin: auth.is_admin().await,
        }
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user.as_ref().map_or("", SessionUser::display_name)
    }
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) => Ok(Self::load(&AuthService::new(session.clone())).await),
            None => Ok(Self::default()),
        }
    }
}

async fn guard(
    auth: &AuthService<Session>,
    required_role: Option<&str>,
    request: Request,
    next: Next,
) -> Response {
    match evaluate(auth, required_role).await {
        GuardDecision::Render => next.run(request).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = %request.uri().path(), to, "Guard redirect");
            Redirect::to(to).into_response()
        }
    }
}

/// Middleware for subtrees that need a signed-in visitor.
pub async fn require_auth(SessionAuth(auth): SessionAuth, request: Request, next: Next) -> Response {
    guard(&auth, None, request, next).await
}

/// Middleware for subtrees that need `ROLE_ADMIN`.
pub async fn require_admin(
    SessionAuth(auth): SessionAuth,
    request: Request,
    next: Next,
) -> Response {
    guard(&auth, Some(Role::Admin.as_str()), request, next).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::session_keys;
    use crate::services::session_store::MemorySessionStore;

    async fn store_with(roles: Option<&str>) -> MemorySessionStore {
        let store = MemorySessionStore::new();
        store.set(session_keys::ACCESS_TOKEN, "a").await.unwrap();
        store.set(session_keys::REFRESH_TOKEN, "r").await.unwrap();
        if let Some(roles) = roles {
            let user = format!(r#"{{"email":"ada@example.com","roles":{roles}}}"#);
            store.set(session_keys::USER, &user).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_unauthenticated_redirects_to_login() {
        let auth = AuthService::new(MemorySessionStore::new());
        assert_eq!(evaluate(&auth, None).await, GuardDecision::Redirect("/login"));
        assert_eq!(
            evaluate(&auth, Some("ROLE_ADMIN")).await,
            GuardDecision::Redirect("/login")
        );
    }

    #[tokio::test]
    async fn test_missing_role_redirects_home() {
        let auth = AuthService::new(store_with(Some(r#"["ROLE_CUSTOMER"]"#)).await);
        assert_eq!(evaluate(&auth, None).await, GuardDecision::Render);
        assert_eq!(
            evaluate(&auth, Some("ROLE_ADMIN")).await,
            GuardDecision::Redirect("/")
        );
    }

    #[tokio::test]
    async fn test_tokens_without_user_fail_role_check() {
        let auth = AuthService::new(store_with(None).await);
        assert_eq!(evaluate(&auth, None).await, GuardDecision::Render);
        assert_eq!(
            evaluate(&auth, Some("ROLE_ADMIN")).await,
            GuardDecision::Redirect("/")
        );
    }

    #[tokio::test]
    async fn test_admin_renders() {
        let auth = AuthService::new(store_with(Some(r#"["ROLE_ADMIN"]"#)).await);
        assert_eq!(evaluate(&auth, Some("ROLE_ADMIN")).await, GuardDecision::Render);

        let visitor = Visitor::load(&auth).await;
        assert!(visitor.is_admin);
        assert_eq!(visitor.display_name(), "ada@example.com");
    }

    #[tokio::test]
    async fn test_visitor_without_tokens_is_anonymous() {
        let store = MemorySessionStore::new();
        store
            .set(session_keys::USER, r#"{"email":"x@example.com","roles":["ROLE_ADMIN"]}"#)
            .await
            .unwrap();
        let visitor = Visitor::load(&AuthService::new(store)).await;
        assert!(!visitor.is_signed_in());
        assert!(!visitor.is_admin);
    }
}
