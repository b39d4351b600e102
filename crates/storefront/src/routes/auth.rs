//! Authentication route handlers.
//!
//! Login goes through the backend; registration is validated here and then
//! simulated, since there is no signup endpoint.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use emporium_core::Role;
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::FormState;
use crate::forms::registration::{RegistrationForm, simulate_registration};
use crate::middleware::{SessionAuth, Visitor};
use crate::routes::paths;
use crate::services::auth::AuthError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub visitor: Visitor,
    pub error: Option<&'static str>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub visitor: Visitor,
    pub form: FormState,
}

/// Registration success page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register_success.html")]
pub struct RegisterSuccessTemplate {
    pub visitor: Visitor,
    pub notice: String,
}

/// Map an error code from the query string to a message.
fn login_error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        _ => "Sign-in is unavailable right now. Please try again later.",
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(visitor: Visitor, Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        visitor,
        error: query.error.as_deref().map(login_error_message),
    }
}

/// Handle login form submission.
///
/// Admins land on the admin dashboard, everyone else on their account.
///
/// # Errors
///
/// Returns `AppError::Auth` if the login cannot be written to the session.
pub async fn login(
    State(state): State<AppState>,
    SessionAuth(auth): SessionAuth,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let password = SecretString::from(form.password);
    match auth.login(state.api(), form.email.trim(), &password).await {
        Ok(user) => {
            set_sentry_user(user.id.as_ref(), &user.email);
            let target = if user.roles.iter().any(|r| r == Role::Admin.as_str()) {
                paths::ADMIN
            } else {
                paths::ACCOUNT
            };
            Ok(Redirect::to(target).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(email = %form.email.trim(), "Login rejected");
            Ok(Redirect::to("/login?error=credentials").into_response())
        }
        Err(AuthError::Api(e)) => {
            tracing::warn!(error = %e, "Login failed");
            Ok(Redirect::to("/login?error=unavailable").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout.
///
/// Always clears the local session and lands on the login page, whatever the
/// backend says.
pub async fn logout(State(state): State<AppState>, SessionAuth(auth): SessionAuth) -> Redirect {
    let target = auth.logout(state.api()).await;
    clear_sentry_user();
    Redirect::to(target)
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(visitor: Visitor) -> impl IntoResponse {
    RegisterTemplate {
        visitor,
        form: FormState::new(),
    }
}

/// Handle registration form submission.
///
/// Invalid input re-renders the form with per-field errors. Valid input
/// waits for the configured delay and shows the success notice; no account
/// is created.
pub async fn register(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(input): Form<RegistrationForm>,
) -> Response {
    let form = input.validate();
    if form.has_errors() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            RegisterTemplate { visitor, form },
        )
            .into_response();
    }

    let notice = simulate_registration(&input, state.config().registration_delay).await;
    RegisterSuccessTemplate { visitor, notice }.into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Json, Router,
        body::Body,
        http::{Request, header},
        routing::post,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::test_support::{body_text, spawn_backend, unreachable_backend};

    fn form_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_short_password_rerenders_with_error() {
        let app = crate::app(StorefrontConfig::for_backend(unreachable_backend().await));
        let response = app
            .oneshot(form_post(
                "/register",
                "name=Ada&email=ada%40example.com&password=abc12&confirm_password=abc12",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_text(response).await;
        assert!(body.contains("Password must be at least 6 characters"));
        assert!(!body.contains("Registration successful"));
        assert!(body.contains(r#"value="ada@example.com""#));
    }

    #[tokio::test]
    async fn test_register_valid_form_shows_notice() {
        let app = crate::app(StorefrontConfig::for_backend(unreachable_backend().await));
        let response = app
            .oneshot(form_post(
                "/register",
                "name=Ada&email=ada%40example.com&password=abc123&confirm_password=abc123",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Registration successful! Welcome, Ada."));
    }

    #[tokio::test]
    async fn test_login_rejected_redirects_with_error() {
        let backend = Router::new().route(
            "/api/auth/login",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"}))) }),
        );
        let app = crate::app(StorefrontConfig::for_backend(spawn_backend(backend).await));
        let response = app
            .oneshot(form_post("/login", "email=ada%40example.com&password=nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login?error=credentials");
    }

    #[tokio::test]
    async fn test_login_success_redirects_admin_to_dashboard() {
        let backend = Router::new().route(
            "/api/auth/login",
            post(|| async {
                Json(json!({
                    "accessToken": "a",
                    "refreshToken": "r",
                    "user": {"id": 3, "email": "ada@example.com", "roles": ["ROLE_ADMIN"]}
                }))
            }),
        );
        let app = crate::app(StorefrontConfig::for_backend(spawn_backend(backend).await));
        let response = app
            .oneshot(form_post("/login", "email=ada%40example.com&password=secret"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[test]
    fn test_login_error_messages() {
        assert_eq!(login_error_message("credentials"), "Invalid email or password.");
        assert!(login_error_message("anything").contains("unavailable"));
    }
}
