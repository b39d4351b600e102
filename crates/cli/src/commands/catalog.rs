//! Catalog lookups against the backend.
//!
//! # Usage
//!
//! ```bash
//! emporium-cli product 42
//! emporium-cli new-arrivals
//! emporium-cli --api-url http://staging:8080/api deals
//! ```

use emporium_storefront::api::ApiClient;
use emporium_storefront::models::ProductView;
use emporium_storefront::routes::products::{ProductDetail, load_product_detail};

use super::CliError;

/// Which canned listing to show.
#[derive(Debug, Clone, Copy)]
pub enum Listing {
    NewArrivals,
    Deals,
}

/// Fetch one product the way the detail page does and log its view model.
///
/// # Errors
///
/// Returns `CliError::ProductNotFound` when the backend rejects the lookup.
pub async fn product(api: &ApiClient, id: &str) -> Result<(), CliError> {
    match load_product_detail(api, id).await {
        ProductDetail::Found { product, related } => {
            tracing::info!(
                "Product {}:\n{}",
                product.id,
                serde_json::to_string_pretty(&product)?
            );
            tracing::info!("{} related products", related.len());
            for item in &related {
                log_summary(item);
            }
            Ok(())
        }
        ProductDetail::NotFound { message } => Err(CliError::ProductNotFound {
            id: id.to_string(),
            message,
        }),
    }
}

/// Log one line per product in a listing.
///
/// # Errors
///
/// Returns `CliError::Api` if the backend call fails.
pub async fn listing(api: &ApiClient, which: Listing) -> Result<(), CliError> {
    let products = match which {
        Listing::NewArrivals => api.new_arrivals().await?,
        Listing::Deals => api.deals().await?,
    };

    tracing::info!("{} products ({which:?})", products.len());
    for dto in products {
        log_summary(&ProductView::from(dto));
    }
    Ok(())
}

fn log_summary(product: &ProductView) {
    match product.savings() {
        Some(saved) => tracing::info!(
            "  #{} {} {} (was {}, save {})",
            product.id,
            product.name,
            product.price,
            product.original_price,
            saved
        ),
        None => tracing::info!("  #{} {} {}", product.id, product.name, product.price),
    }
}
