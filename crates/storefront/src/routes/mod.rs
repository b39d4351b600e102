//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page (new arrivals, deals)
//! GET  /health                        - Health check
//!
//! # Products
//! GET  /product/{id}                  - Product detail (?qty=, ?option.<Name>=)
//! POST /cart/add                      - Add to cart (logs, redirects back)
//!
//! # Auth
//! GET  /login                         - Login page
//! POST /login                         - Login action
//! GET  /register                      - Register page
//! POST /register                      - Register action (simulated)
//! POST /logout                        - Logout action
//!
//! # Account (requires auth)
//! GET  /account                       - Personal info
//! GET  /account/addresses             - Address book
//! GET  /account/orders                - Order history
//! POST /account/orders/{id}/{action}  - cancel | review | buy-again
//!
//! # Admin (requires ROLE_ADMIN)
//! GET  /admin                         - Dashboard
//! GET  /admin/products                - Product list
//! GET  /admin/products/{id}/edit      - Editor (?tab=)
//! POST /admin/products/{id}/edit      - Save (validates, logs, redirects)
//! POST /admin/products/{id}/delete    - Delete (logs, redirects)
//! POST /admin/products/{id}/image     - Image preview (multipart)
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::{require_admin, require_auth};
use crate::state::AppState;

/// Well-known paths used for redirects.
pub mod paths {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const ACCOUNT: &str = "/account";
    pub const ACCOUNT_ORDERS: &str = "/account/orders";
    pub const ADMIN: &str = "/admin";
    pub const ADMIN_PRODUCTS: &str = "/admin/products";

    /// Detail page for one product.
    #[must_use]
    pub fn product(id: &str) -> String {
        format!("/product/{id}")
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
///
/// Every route requires a signed-in visitor.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/addresses", get(account::addresses))
        .route("/orders", get(account::orders))
        .route("/orders/{id}/{action}", post(account::order_action))
        .layer(middleware::from_fn(require_auth))
}

/// Create the admin routes router.
///
/// Every route requires `ROLE_ADMIN`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/products", get(admin::products))
        .route(
            "/products/{id}/edit",
            get(admin::edit_page).post(admin::save),
        )
        .route("/products/{id}/delete", post(admin::delete))
        .route("/products/{id}/image", admin::image_upload_route())
        .layer(middleware::from_fn(require_admin))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product detail
        .route("/product/{id}", get(products::show))
        // Cart
        .route("/cart/add", post(cart::add))
        // Auth routes
        .merge(auth_routes())
        // Account routes
        .nest("/account", account_routes())
        // Admin routes
        .nest("/admin", admin_routes())
}
