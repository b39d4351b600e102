//! Admin console route handlers.
//!
//! These routes sit behind the admin guard. The product editor works on
//! placeholder data; save and delete are recorded but not persisted.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{MethodRouter, post},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::forms::product_editor::{
    EditorField, EditorTab, ImagePreviewError, MAX_IMAGE_BYTES, ProductEditor, TabLink,
};
use crate::middleware::Visitor;
use crate::models::ProductView;
use crate::routes::paths;
use crate::state::AppState;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// Request body cap for image uploads: the image cap plus multipart framing.
pub const IMAGE_UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 64 * 1024;

/// Query parameters for the editor.
#[derive(Debug, Deserialize)]
pub struct EditorQuery {
    pub tab: Option<String>,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub visitor: Visitor,
    pub product_count: usize,
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub visitor: Visitor,
    pub products: Vec<ProductView>,
}

/// Product editor template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_edit.html")]
pub struct ProductEditTemplate {
    pub visitor: Visitor,
    pub product_id: String,
    pub tabs: Vec<TabLink>,
    pub active_tab: EditorTab,
    pub fields: Vec<EditorField>,
    pub image_preview: Option<String>,
    pub image_error: Option<String>,
}

impl ProductEditTemplate {
    fn new(visitor: Visitor, editor: &ProductEditor, image_error: Option<String>) -> Self {
        Self {
            visitor,
            product_id: editor.product_id.clone(),
            tabs: editor.tabs(),
            active_tab: editor.tab,
            fields: editor.fields(),
            image_preview: editor.image_preview.clone(),
            image_error,
        }
    }
}

/// Every product the listing endpoints expose, first occurrence wins.
async fn catalog(state: &AppState) -> Vec<ProductView> {
    let (new_arrivals, deals) = tokio::join!(state.api().new_arrivals(), state.api().deals());

    let mut products: Vec<ProductView> = Vec::new();
    for (name, result) in [("new-arrivals", new_arrivals), ("deals", deals)] {
        match result {
            Ok(listing) => {
                for dto in listing {
                    let product = ProductView::from(dto);
                    if !products.iter().any(|p| p.id == product.id) {
                        products.push(product);
                    }
                }
            }
            Err(e) => tracing::error!(listing = name, error = %e, "Failed to load admin catalog"),
        }
    }
    products
}

/// Display the admin dashboard.
pub async fn dashboard(State(state): State<AppState>, visitor: Visitor) -> impl IntoResponse {
    DashboardTemplate {
        visitor,
        product_count: catalog(&state).await.len(),
    }
}

/// Display the product list.
pub async fn products(State(state): State<AppState>, visitor: Visitor) -> impl IntoResponse {
    ProductsTemplate {
        visitor,
        products: catalog(&state).await,
    }
}

/// Display the product editor.
pub async fn edit_page(
    Path(id): Path<String>,
    Query(query): Query<EditorQuery>,
    visitor: Visitor,
) -> impl IntoResponse {
    let editor = ProductEditor::seeded(id, EditorTab::from_slug(query.tab.as_deref()));
    ProductEditTemplate::new(visitor, &editor, None)
}

/// Handle editor submission.
///
/// Invalid input re-renders the editor on the first tab with an error. Valid
/// input is logged and the admin returns to the product list.
#[instrument(skip(visitor, submitted))]
pub async fn save(
    Path(id): Path<String>,
    visitor: Visitor,
    Form(submitted): Form<HashMap<String, String>>,
) -> Response {
    let tab = EditorTab::from_slug(submitted.get("tab").map(String::as_str));
    let mut editor = ProductEditor::seeded(id, tab);
    editor.apply(&submitted);

    if !editor.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            ProductEditTemplate::new(visitor, &editor, None),
        )
            .into_response();
    }

    tracing::info!(
        product_id = %editor.product_id,
        name = %editor.form.value("name"),
        price = %editor.form.value("price"),
        "Product save requested (not persisted)"
    );
    add_breadcrumb(
        "admin",
        "Product save requested",
        Some(&[("product_id", editor.product_id.as_str())]),
    );

    Redirect::to(paths::ADMIN_PRODUCTS).into_response()
}

/// Handle product deletion.
#[instrument]
pub async fn delete(Path(id): Path<String>) -> Redirect {
    tracing::info!(product_id = %id, "Product delete requested (not persisted)");
    add_breadcrumb(
        "admin",
        "Product delete requested",
        Some(&[("product_id", id.as_str())]),
    );
    Redirect::to(paths::ADMIN_PRODUCTS)
}

/// The image upload endpoint, with a body limit sized for [`MAX_IMAGE_BYTES`].
pub fn image_upload_route() -> MethodRouter<AppState> {
    post(upload_image).layer(DefaultBodyLimit::max(IMAGE_UPLOAD_BODY_LIMIT))
}

/// Handle an image upload by rendering it as a preview on the media tab.
///
/// Rejected images re-render the editor with the reason. A body over
/// [`IMAGE_UPLOAD_BODY_LIMIT`] is reported as too large with 413.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the multipart body is malformed.
pub async fn upload_image(
    Path(id): Path<String>,
    visitor: Visitor,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut editor = ProductEditor::seeded(id, EditorTab::Media);

    let upload = match read_image_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(product_id = %editor.product_id, "Image upload over body limit");
            let message = ImagePreviewError::TooLarge {
                max: MAX_IMAGE_BYTES,
            }
            .to_string();
            return Ok((
                StatusCode::PAYLOAD_TOO_LARGE,
                ProductEditTemplate::new(visitor, &editor, Some(message)),
            )
                .into_response());
        }
        Err(e) => return Err(AppError::BadRequest(e.body_text())),
    };

    let outcome = match upload {
        Some((content_type, bytes)) => editor.attach_image(&content_type, &bytes),
        None => editor.attach_image("", &[]),
    };

    Ok(match outcome {
        Ok(()) => {
            tracing::debug!(product_id = %editor.product_id, "Image preview rendered");
            ProductEditTemplate::new(visitor, &editor, None).into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            ProductEditTemplate::new(visitor, &editor, Some(e.to_string())),
        )
            .into_response(),
    })
}

/// Content type and bytes of the image field, if the form has one.
async fn read_image_field(
    multipart: &mut Multipart,
) -> std::result::Result<Option<(String, Bytes)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Some((content_type, bytes)));
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, header},
        routing::{get, post},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::test_support::{body_text, unreachable_backend};

    async fn state() -> AppState {
        AppState::new(StorefrontConfig::for_backend(unreachable_backend().await))
    }

    #[tokio::test]
    async fn test_edit_page_opens_requested_tab() {
        let app = Router::new()
            .route("/edit/{id}", get(edit_page))
            .with_state(state().await);
        let response = app
            .oneshot(Request::get("/edit/9?tab=pricing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"name="special_price""#));
        assert!(!body.contains(r#"name="sku""#));
    }

    #[tokio::test]
    async fn test_save_invalid_rerenders_and_valid_redirects() {
        let app = Router::new()
            .route("/edit/{id}", post(save))
            .with_state(state().await);

        let invalid = app
            .clone()
            .oneshot(
                Request::post("/edit/9")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("tab=general&price=free"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(invalid).await.contains("Price must be a positive number"));

        let valid = app
            .oneshot(
                Request::post("/edit/9")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("tab=pricing&price=10.50&special_price=9&stock=3"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(valid.status(), StatusCode::SEE_OTHER);
        assert_eq!(valid.headers()[header::LOCATION], "/admin/products");
    }

    const BOUNDARY: &str = "XBOUNDARYX";

    fn png_upload(payload: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/image/9")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn upload(payload: &[u8]) -> (StatusCode, String) {
        let app = Router::new()
            .route("/image/{id}", image_upload_route())
            .with_state(state().await);
        let response = app.oneshot(png_upload(payload)).await.unwrap();
        let status = response.status();
        (status, body_text(response).await)
    }

    #[tokio::test]
    async fn test_upload_image_renders_preview() {
        let (status, body) = upload(b"PNG!").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data:image/png;base64,UE5HIQ=="));
    }

    #[tokio::test]
    async fn test_upload_image_above_default_body_limit() {
        let (status, body) = upload(&vec![0x89; 3 * 1024 * 1024]).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_upload_image_over_cap_rerenders_editor() {
        let too_large = ImagePreviewError::TooLarge {
            max: MAX_IMAGE_BYTES,
        }
        .to_string();

        let (status, body) = upload(&vec![0x89; MAX_IMAGE_BYTES + 1]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(&too_large));
        assert!(body.contains(r#"name="image_url""#));

        let (status, body) = upload(&vec![0x89; 2 * MAX_IMAGE_BYTES]).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body.contains(&too_large));
    }
}
