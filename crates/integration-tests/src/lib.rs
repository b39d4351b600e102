//! Integration tests for the Emporium storefront.
//!
//! Each test starts a fake backend and a real storefront on ephemeral ports,
//! then drives the storefront with a cookie-keeping HTTP client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emporium-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - login, guards and logout
//! - `storefront_pages` - product, home and registration pages

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use emporium_storefront::config::StorefrontConfig;
use reqwest::{Client, redirect};
use serde_json::{Value, json};
use url::Url;

/// Password the fake backend accepts for every account.
pub const PASSWORD: &str = "correct horse";

/// Customer account known to the fake backend.
pub const CUSTOMER_EMAIL: &str = "casey@example.com";

/// Admin account known to the fake backend.
pub const ADMIN_EMAIL: &str = "avery@example.com";

/// An in-process stand-in for the backend REST API.
pub struct FakeBackend {
    pub url: Url,
    logout_calls: Arc<AtomicUsize>,
}

impl FakeBackend {
    /// Start the backend on an ephemeral port.
    ///
    /// Logout answers 500 so callers can check that the storefront signs the
    /// visitor out locally anyway.
    pub async fn start() -> Self {
        let logout_calls = Arc::new(AtomicUsize::new(0));
        let counter = logout_calls.clone();

        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route(
                "/api/auth/logout",
                post(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({"message": "token store unavailable"})),
                        )
                    }
                }),
            )
            .route("/api/products/new-arrivals", get(|| async { Json(json!([product(1), product(2)])) }))
            .route("/api/products/deals", get(|| async { Json(json!({"content": [product(3)]})) }))
            .route("/api/products/{id}", get(product_by_id))
            .route(
                "/api/products/{id}/related",
                get(|| async { Json(json!([product(2), product(3), product(4), product(5), product(6)])) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{addr}/api")).unwrap(),
            logout_calls,
        }
    }

    /// How many logout requests the backend has seen.
    #[must_use]
    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] != PASSWORD || (email != CUSTOMER_EMAIL && email != ADMIN_EMAIL) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Bad credentials"})),
        );
    }

    let roles = if email == ADMIN_EMAIL {
        json!(["ROLE_CUSTOMER", "ROLE_ADMIN"])
    } else {
        json!(["ROLE_CUSTOMER"])
    };

    (
        StatusCode::OK,
        Json(json!({
            "accessToken": format!("access-{email}"),
            "refreshToken": format!("refresh-{email}"),
            "user": {"id": 7, "name": "Casey Jones", "email": email, "roles": roles},
            "customerProfile": {
                "name": "Casey Jones",
                "email": email,
                "joinDate": "2022-09-01",
                "addresses": [
                    {"id": 1, "type": "Home", "name": "Casey Jones", "street": "12 Elm St",
                     "city": "Portland", "state": "OR", "isDefault": true}
                ],
                "orders": [
                    {"id": 1001, "date": "2024-03-02", "status": "delivered", "total": 45,
                     "shippingAddressId": 1,
                     "items": [{"name": "Canvas Tote", "quantity": 1, "price": 45}]},
                    {"id": 1002, "date": "2024-05-20", "status": "processing", "total": 30,
                     "items": [{"name": "Enamel Mug", "quantity": 2, "price": 15}]}
                ]
            }
        })),
    )
}

async fn product_by_id(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id >= 900 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("No product with id {id}")})),
        );
    }
    (StatusCode::OK, Json(product(id)))
}

/// A product record in the backend's wire format.
#[must_use]
pub fn product(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Catalog Item {id}"),
        "description": "A fine thing.",
        "price": 40,
        "specialPrice": if id % 2 == 0 { json!(30) } else { Value::Null },
        "thumbnail": format!("/img/{id}.jpg"),
        "rating": 4,
        "stock": 3,
        "categoryName": "Home Goods",
        "variants": [
            {"attributes": {"Color": "Sand"}},
            {"attributes": {"Color": "Slate"}}
        ]
    })
}

/// A storefront served on an ephemeral port, wired to a fake backend.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub backend: FakeBackend,
}

impl TestContext {
    /// Start a fake backend and a storefront pointing at it.
    pub async fn start() -> Self {
        let backend = FakeBackend::start().await;
        let app = emporium_storefront::app(StorefrontConfig::for_backend(backend.url.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Redirects are asserted, not followed.
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path; returns status, `Location` header and body.
    pub async fn get(&self, path: &str) -> (StatusCode, Option<String>, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        Self::unpack(response).await
    }

    /// POST a form; returns status, `Location` header and body.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> (StatusCode, Option<String>, String) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap();
        Self::unpack(response).await
    }

    /// Sign in through the login form.
    pub async fn login(&self, email: &str) -> Option<String> {
        let (status, location, _) = self
            .post_form("/login", &[("email", email), ("password", PASSWORD)])
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        location
    }

    async fn unpack(response: reqwest::Response) -> (StatusCode, Option<String>, String) {
        let status = response.status();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap();
        (status, location, body)
    }
}
