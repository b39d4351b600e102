//! Wire types for the backend REST API.
//!
//! The product record is wide and inconsistent across backend versions, so
//! almost every field is optional and several attributes arrive under more
//! than one name. Mapping into the render-ready shape happens in
//! [`crate::models::product`].

use std::collections::BTreeMap;

use emporium_core::{Price, ProductId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{CustomerProfile, SessionUser};

/// A product as the backend sends it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub price: Price,
    pub special_price: Option<Price>,
    pub old_price: Option<Price>,
    pub images: Option<Vec<ImageDto>>,
    pub image_url: Option<String>,
    pub thumbnail: Option<String>,
    pub average_rating: Option<f64>,
    pub rating: Option<f64>,
    pub stock_quantity: Option<u32>,
    pub stock: Option<u32>,
    pub category: Option<CategoryDto>,
    pub category_name: Option<String>,
    pub sku: Option<String>,
    pub slug: Option<String>,
    pub brand: Option<String>,
    pub weight: Option<serde_json::Value>,
    pub dimensions: Option<serde_json::Value>,
    pub specifications: Option<BTreeMap<String, serde_json::Value>>,
    pub attributes: Option<Vec<AttributeDto>>,
    pub options: Option<Vec<OptionDto>>,
    pub variants: Option<Vec<VariantDto>>,
}

/// Images come either as bare URLs or as objects.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ImageDto {
    Url(String),
    Object {
        url: String,
        #[serde(default)]
        alt: Option<String>,
    },
}

impl ImageDto {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Object { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryDto {
    pub name: Option<String>,
}

/// A specification row in list form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttributeDto {
    pub name: String,
    pub value: serde_json::Value,
}

/// A selectable option with its allowed values.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptionDto {
    pub name: String,
    pub values: Option<Vec<String>>,
}

/// A purchasable variant; its attributes imply selectable options.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VariantDto {
    pub attributes: Option<BTreeMap<String, String>>,
}

/// Listing responses are either a bare array or a page envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Page { content: Vec<T> },
    Data { data: Vec<T> },
}

impl<T> Listing<T> {
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Page { content: items } | Self::Data { data: items } => {
                items
            }
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: SessionUser,
    /// Malformed profiles read as absent so they never block a login.
    #[serde(default, deserialize_with = "lenient_profile")]
    pub customer_profile: Option<CustomerProfile>,
}

fn lenient_profile<'de, D>(deserializer: D) -> Result<Option<CustomerProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value(value) {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed customer profile in login response");
            None
        }
    }))
}

/// Body of `POST /auth/logout`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest<'a> {
    pub refresh_token: &'a str,
}

/// Error envelope the backend uses for non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}
