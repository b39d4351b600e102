//! Product view model and its mapping from the backend record.

use std::collections::{BTreeMap, HashMap};

use emporium_core::{Price, ProductId};
use serde::Serialize;

use crate::api::types::{ImageDto, ProductDto};

/// Shown when a product has no images at all.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.svg";

const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Query parameter prefix for option selections (`option.Size=42`).
pub const OPTION_PARAM_PREFIX: &str = "option.";

/// Render-ready product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub short_description: String,
    pub description: String,
    /// What the customer pays now.
    pub price: Price,
    /// What the product cost before any discount.
    pub original_price: Price,
    pub images: Vec<String>,
    pub rating: f64,
    pub stock: u32,
    pub category: String,
    pub sku: Option<String>,
    pub slug: Option<String>,
    pub brand: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub specifications: BTreeMap<String, String>,
    pub options: Vec<ProductOption>,
}

/// A selectable option such as size or colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

impl From<ProductDto> for ProductView {
    fn from(dto: ProductDto) -> Self {
        let price = dto.special_price.unwrap_or(dto.price);
        let original_price = dto.old_price.unwrap_or(dto.price);

        let mut images: Vec<String> = dto
            .images
            .unwrap_or_default()
            .iter()
            .map(ImageDto::url)
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .collect();
        if images.is_empty() {
            images.extend(
                dto.image_url
                    .or(dto.thumbnail)
                    .filter(|url| !url.is_empty()),
            );
        }

        let description = dto.description.unwrap_or_default();
        let short_description = dto
            .short_description
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| description.clone());

        let category = dto
            .category
            .and_then(|category| category.name)
            .or(dto.category_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let specifications = match dto.specifications {
            Some(map) if !map.is_empty() => map
                .iter()
                .filter_map(|(label, value)| Some((label.clone(), display_scalar(value)?)))
                .collect(),
            _ => dto
                .attributes
                .unwrap_or_default()
                .iter()
                .filter_map(|attr| Some((attr.name.clone(), display_scalar(&attr.value)?)))
                .collect(),
        };

        let options = match dto.options {
            Some(options) if !options.is_empty() => options
                .into_iter()
                .map(|option| ProductOption {
                    name: option.name,
                    values: dedup(option.values.unwrap_or_default()),
                })
                .filter(|option| !option.values.is_empty())
                .collect(),
            _ => options_from_variants(dto.variants.unwrap_or_default().into_iter().filter_map(
                |variant| variant.attributes,
            )),
        };

        Self {
            id: dto.id,
            name: dto.name,
            short_description,
            description,
            price,
            original_price,
            images,
            rating: dto.average_rating.or(dto.rating).unwrap_or(0.0).clamp(0.0, 5.0),
            stock: dto.stock_quantity.or(dto.stock).unwrap_or(0),
            category,
            sku: dto.sku,
            slug: dto.slug,
            brand: dto.brand,
            weight: dto.weight.as_ref().and_then(display_scalar),
            dimensions: dto.dimensions.as_ref().and_then(display_dimensions),
            specifications,
            options,
        }
    }
}

impl ProductView {
    /// Amount saved against the original price; `None` hides the badge.
    #[must_use]
    pub fn savings(&self) -> Option<Price> {
        self.price.savings_from(self.original_price)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// First image, or the placeholder.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    /// Rating rounded to one decimal, for display next to the stars.
    #[must_use]
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }

    #[must_use]
    pub fn has_details(&self) -> bool {
        self.sku.is_some()
            || self.brand.is_some()
            || self.weight.is_some()
            || self.dimensions.is_some()
            || !self.specifications.is_empty()
    }
}

/// Render strings and numbers; ignore structured values.
fn display_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        _ => None,
    }
}

/// Dimensions arrive as a string or as `{length, width, height}`.
fn display_dimensions(value: &serde_json::Value) -> Option<String> {
    if let Some(text) = display_scalar(value) {
        return Some(text);
    }
    let object = value.as_object()?;
    let parts: Vec<String> = ["length", "width", "height"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(display_scalar))
        .collect();
    (!parts.is_empty()).then(|| parts.join(" x "))
}

/// Keep the first occurrence of each value.
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Collect option names and values implied by variant attributes.
fn options_from_variants(
    variants: impl Iterator<Item = BTreeMap<String, String>>,
) -> Vec<ProductOption> {
    let mut options: Vec<ProductOption> = Vec::new();
    for attributes in variants {
        for (name, value) in attributes {
            match options.iter_mut().find(|option| option.name == name) {
                Some(option) => {
                    if !option.values.contains(&value) {
                        option.values.push(value);
                    }
                }
                None => options.push(ProductOption {
                    name,
                    values: vec![value],
                }),
            }
        }
    }
    options
}

// =============================================================================
// Selection
// =============================================================================

/// The quantity and option choices for the detail page selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub quantity: u32,
    pub max_quantity: u32,
    pub options: Vec<OptionChoice>,
}

/// One option with its values and which one is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionChoice {
    pub name: String,
    pub param: String,
    pub values: Vec<OptionValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    pub value: String,
    pub selected: bool,
}

impl Selection {
    /// Read the selectors from query parameters.
    ///
    /// `qty` is clamped to `1..=max(stock, 1)`. Option values not offered by
    /// the product are ignored in favour of the first allowed value.
    #[must_use]
    pub fn from_query(product: &ProductView, query: &HashMap<String, String>) -> Self {
        let max_quantity = product.stock.max(1);
        let quantity = query
            .get("qty")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .clamp(1, max_quantity);

        let options = product
            .options
            .iter()
            .map(|option| {
                let param = format!("{OPTION_PARAM_PREFIX}{}", option.name);
                let requested = query
                    .get(&param)
                    .filter(|value| option.values.contains(value));
                let chosen = requested.or_else(|| option.values.first());
                OptionChoice {
                    name: option.name.clone(),
                    values: option
                        .values
                        .iter()
                        .map(|value| OptionValue {
                            value: value.clone(),
                            selected: Some(value) == chosen,
                        })
                        .collect(),
                    param,
                }
            })
            .collect();

        Self {
            quantity,
            max_quantity,
            options,
        }
    }

    /// The chosen value for each option, by option name.
    #[must_use]
    pub fn chosen(&self) -> BTreeMap<&str, &str> {
        self.options
            .iter()
            .filter_map(|option| {
                option
                    .values
                    .iter()
                    .find(|value| value.selected)
                    .map(|value| (option.name.as_str(), value.value.as_str()))
            })
            .collect()
    }
}
