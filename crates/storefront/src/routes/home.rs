//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::api::{ApiError, types::ProductDto};
use crate::filters;
use crate::middleware::Visitor;
use crate::models::ProductView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub visitor: Visitor,
    pub new_arrivals: Vec<ProductView>,
    pub deals: Vec<ProductView>,
}

/// Map a listing result; a failure is logged and renders an empty section.
fn section(name: &str, result: Result<Vec<ProductDto>, ApiError>) -> Vec<ProductView> {
    match result {
        Ok(products) => products.into_iter().map(ProductView::from).collect(),
        Err(e) => {
            tracing::error!(section = name, error = %e, "Failed to load home listing");
            Vec::new()
        }
    }
}

/// Display the home page.
#[instrument(skip(state, visitor))]
pub async fn home(State(state): State<AppState>, visitor: Visitor) -> impl IntoResponse {
    let (new_arrivals, deals) = tokio::join!(state.api().new_arrivals(), state.api().deals());

    HomeTemplate {
        visitor,
        new_arrivals: section("new-arrivals", new_arrivals),
        deals: section("deals", deals),
    }
}
