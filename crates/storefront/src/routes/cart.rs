//! Cart route handlers.
//!
//! There is no cart backend yet. Adding to cart records the intent and sends
//! the visitor back to the product page.

use std::collections::HashMap;

use axum::{
    Form,
    response::{IntoResponse, Redirect},
};
use emporium_core::ProductId;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::models::product::OPTION_PARAM_PREFIX;
use crate::routes::paths;

/// Add a product to the cart.
///
/// Expects `product_id` and `qty`, plus one `option.<Name>` field per chosen
/// option. A missing or malformed product id sends the visitor home.
#[instrument(skip(form))]
pub async fn add(Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    let Some(product_id) = form
        .get("product_id")
        .and_then(|id| id.trim().parse::<ProductId>().ok())
    else {
        tracing::debug!(product_id = ?form.get("product_id"), "Add to cart without a valid product");
        return Redirect::to(paths::HOME);
    };
    let product_id = product_id.to_string();
    let quantity = form.get("qty").map_or("1", String::as_str);
    let options: Vec<String> = form
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(OPTION_PARAM_PREFIX)
                .map(|name| format!("{name}={value}"))
        })
        .collect();

    tracing::info!(
        product_id = %product_id,
        quantity,
        options = ?options,
        "Add to cart requested"
    );
    add_breadcrumb(
        "cart",
        "Add to cart",
        Some(&[("product_id", product_id.as_str()), ("quantity", quantity)]),
    );

    Redirect::to(&paths::product(&product_id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use crate::config::StorefrontConfig;
    use crate::test_support::unreachable_backend;

    #[tokio::test]
    async fn test_add_redirects_back_to_product() {
        let app = crate::app(StorefrontConfig::for_backend(unreachable_backend().await));
        let response = app
            .oneshot(
                Request::post("/cart/add")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("product_id=7&qty=2&option.Size=42"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/product/7");
    }

    #[tokio::test]
    async fn test_add_with_bad_product_id_goes_home() {
        for body in ["qty=1", "product_id=&qty=1", "product_id=..%2Fadmin&qty=1", "product_id=%2F%2Fevil.example"] {
            let app = crate::app(StorefrontConfig::for_backend(unreachable_backend().await));
            let response = app
                .oneshot(
                    Request::post("/cart/add")
                        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{body}");
            assert_eq!(response.headers()[header::LOCATION], "/", "{body}");
        }
    }
}
