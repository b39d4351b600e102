//! Product detail route handler.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::api::ApiClient;
use crate::filters;
use crate::middleware::Visitor;
use crate::models::{ProductView, Selection};
use crate::state::AppState;

/// How many related products the detail page shows.
pub const RELATED_LIMIT: usize = 4;

/// Shown when the backend rejects the lookup without saying why.
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "The product you are looking for does not exist.";

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub visitor: Visitor,
    pub product: ProductView,
    pub related: Vec<ProductView>,
    pub selection: Selection,
}

/// Product not found template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub visitor: Visitor,
    pub message: String,
}

/// What the detail page renders.
#[derive(Debug)]
pub enum ProductDetail {
    Found {
        product: ProductView,
        related: Vec<ProductView>,
    },
    NotFound {
        message: String,
    },
}

/// Fetch a product and its related products.
///
/// A failed primary fetch yields `NotFound` with the backend's message when
/// it sent one. A failed related fetch is logged and yields no related
/// products.
pub async fn load_product_detail(api: &ApiClient, id: &str) -> ProductDetail {
    let product = match api.product(id).await {
        Ok(dto) => ProductView::from(dto),
        Err(e) => {
            tracing::warn!(product_id = %id, error = %e, "Product fetch failed");
            return ProductDetail::NotFound {
                message: e
                    .server_message()
                    .unwrap_or(DEFAULT_NOT_FOUND_MESSAGE)
                    .to_string(),
            };
        }
    };

    let related = match api.related_products(id, RELATED_LIMIT).await {
        Ok(products) => products.into_iter().map(ProductView::from).collect(),
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Related products fetch failed");
            Vec::new()
        }
    };

    ProductDetail::Found { product, related }
}

/// Display the product detail page.
#[instrument(skip(state, query, visitor))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    visitor: Visitor,
) -> Response {
    match load_product_detail(state.api(), &id).await {
        ProductDetail::Found { product, related } => {
            let selection = Selection::from_query(&product, &query);
            ProductShowTemplate {
                visitor,
                product,
                related,
                selection,
            }
            .into_response()
        }
        ProductDetail::NotFound { message } => (
            StatusCode::NOT_FOUND,
            ProductNotFoundTemplate { visitor, message },
        )
            .into_response(),
    }
}
