//! Helpers shared by unit tests: an in-process fake backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use serde_json::{Value, json};
use url::Url;

/// Serve `router` on an ephemeral port and return the API base URL.
///
/// Routes should be declared under `/api`.
pub async fn spawn_backend(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/api")).unwrap()
}

/// A base URL on a port nothing is listening on.
pub async fn unreachable_backend() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/api")).unwrap()
}

/// A product record with the commonly used optional fields filled in.
pub fn product_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": if id == 1 { "Trail Runner".to_string() } else { format!("Product {id}") },
        "description": "Lightweight running shoe for rough terrain.",
        "price": 120,
        "specialPrice": 90,
        "oldPrice": 150,
        "images": ["/img/runner-1.jpg", {"url": "/img/runner-2.jpg"}],
        "averageRating": 4.5,
        "stockQuantity": 8,
        "category": {"name": "Footwear"},
        "sku": "TR-001",
        "brand": "Northpeak",
        "specifications": {"Material": "Mesh", "Drop": 8},
        "options": [{"name": "Size", "values": ["41", "42", "42", "43"]}]
    })
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
