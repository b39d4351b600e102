//! Public pages and forms against a live storefront.
//!
//! Run with: `cargo test -p emporium-integration-tests --test storefront_pages`

#![allow(clippy::unwrap_used)]

use emporium_integration_tests::TestContext;
use reqwest::StatusCode;

#[tokio::test]
async fn test_home_lists_both_sections() {
    let ctx = TestContext::start().await;

    let (status, _, body) = ctx.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Catalog Item 1"));
    assert!(body.contains("Catalog Item 3"));
}

#[tokio::test]
async fn test_product_page_with_related_limit() {
    let ctx = TestContext::start().await;

    let (status, _, body) = ctx.get("/product/2?option.Color=Slate").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Catalog Item 2</h1>"));
    assert!(body.contains("Save $10.00"));
    assert!(body.contains(r#"<option value="Slate" selected>"#));
    assert!(body.contains("Catalog Item 5"));
    assert!(!body.contains("Catalog Item 6"));
}

#[tokio::test]
async fn test_missing_product_shows_backend_message() {
    let ctx = TestContext::start().await;

    let (status, _, body) = ctx.get("/product/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No product with id 999"));
}

#[tokio::test]
async fn test_registration_rejects_short_password() {
    let ctx = TestContext::start().await;

    let (status, _, body) = ctx
        .post_form(
            "/register",
            &[
                ("name", "Casey"),
                ("email", "casey@example.com"),
                ("password", "abc"),
                ("confirm_password", "abc"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Password must be at least 6 characters"));
}

#[tokio::test]
async fn test_registration_success_notice() {
    let ctx = TestContext::start().await;

    let (status, _, body) = ctx
        .post_form(
            "/register",
            &[
                ("name", "Casey"),
                ("email", "casey@example.com"),
                ("password", "abc123"),
                ("confirm_password", "abc123"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Registration successful! Welcome, Casey."));
}

#[tokio::test]
async fn test_add_to_cart_returns_to_product() {
    let ctx = TestContext::start().await;

    let (status, location, _) = ctx
        .post_form("/cart/add", &[("product_id", "2"), ("qty", "1")])
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/product/2"));
}
