//! Admin product editor form.
//!
//! The editor is seeded with fixed placeholder values rather than loaded from
//! the backend, and saving is not wired to any persistence endpoint. What it
//! does own: the tab layout, writing submitted fields into the form state,
//! checking the numeric fields, and turning an uploaded image into a preview.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;

use super::FormState;

/// Largest image accepted for preview (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Editor tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    #[default]
    General,
    Pricing,
    Inventory,
    Media,
    Specifications,
}

impl EditorTab {
    pub const ALL: [Self; 5] = [
        Self::General,
        Self::Pricing,
        Self::Inventory,
        Self::Media,
        Self::Specifications,
    ];

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Pricing => "pricing",
            Self::Inventory => "inventory",
            Self::Media => "media",
            Self::Specifications => "specifications",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Pricing => "Pricing",
            Self::Inventory => "Inventory",
            Self::Media => "Media",
            Self::Specifications => "Specifications",
        }
    }

    /// Unknown or missing slugs open the first tab.
    #[must_use]
    pub fn from_slug(slug: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|tab| Some(tab.slug()) == slug)
            .unwrap_or_default()
    }
}

/// Static description of one editor field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub tab: EditorTab,
    pub multiline: bool,
    placeholder: &'static str,
}

const fn field(
    name: &'static str,
    label: &'static str,
    tab: EditorTab,
    placeholder: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        tab,
        multiline: false,
        placeholder,
    }
}

const fn text_area(
    name: &'static str,
    label: &'static str,
    tab: EditorTab,
    placeholder: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        tab,
        multiline: true,
        placeholder,
    }
}

/// Every field the editor knows, with its seed value.
pub const FIELDS: [FieldSpec; 14] = [
    field("name", "Product name", EditorTab::General, "Wireless Noise-Cancelling Headphones"),
    field("brand", "Brand", EditorTab::General, "Acme Audio"),
    field("category", "Category", EditorTab::General, "Electronics"),
    field("short_description", "Short description", EditorTab::General, "Over-ear headphones with 30-hour battery life."),
    text_area("description", "Description", EditorTab::General, "Immersive sound, adaptive noise cancelling and all-day comfort in a foldable design."),
    field("price", "Price", EditorTab::Pricing, "249.99"),
    field("special_price", "Sale price", EditorTab::Pricing, "199.99"),
    field("sku", "SKU", EditorTab::Inventory, "ACM-WH-1000"),
    field("stock", "Stock", EditorTab::Inventory, "42"),
    field("weight", "Weight (kg)", EditorTab::Inventory, "0.25"),
    field("dimensions", "Dimensions", EditorTab::Inventory, "20 x 18 x 8 cm"),
    field("image_url", "Image URL", EditorTab::Media, "/static/img/placeholder.svg"),
    text_area("specifications", "Specifications (one \"Label: value\" per line)", EditorTab::Specifications, "Battery life: 30 hours\nConnectivity: Bluetooth 5.3\nWeight: 250 g"),
    field("options", "Options (e.g. Color: Black, Silver)", EditorTab::Specifications, "Color: Black, Silver"),
];

/// A field ready for the template.
#[derive(Debug, Clone)]
pub struct EditorField {
    pub name: &'static str,
    pub label: &'static str,
    pub multiline: bool,
    pub value: String,
    pub error: Option<String>,
}

/// One entry of the tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabLink {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Errors raised while preparing an image preview.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImagePreviewError {
    #[error("no file was uploaded")]
    Empty,
    #[error("'{0}' is not an image")]
    NotAnImage(String),
    #[error("image is larger than {max} bytes")]
    TooLarge { max: usize },
}

/// Editor state for one request.
#[derive(Debug, Clone)]
pub struct ProductEditor {
    pub product_id: String,
    pub tab: EditorTab,
    pub form: FormState,
    pub image_preview: Option<String>,
}

impl ProductEditor {
    /// A fresh editor holding the placeholder values.
    #[must_use]
    pub fn seeded(product_id: impl Into<String>, tab: EditorTab) -> Self {
        let mut form = FormState::new();
        for spec in FIELDS {
            form.set_value(spec.name, spec.placeholder);
        }
        Self {
            product_id: product_id.into(),
            tab,
            form,
            image_preview: None,
        }
    }

    /// Write submitted values into the form. Unknown keys are ignored.
    pub fn apply(&mut self, submitted: &HashMap<String, String>) {
        for spec in FIELDS {
            if let Some(value) = submitted.get(spec.name) {
                self.form.set_value(spec.name, value.as_str());
            }
        }
    }

    /// Check the fields that must parse; returns true when the form is clean.
    ///
    /// Errors also move the editor to the first tab containing one.
    pub fn validate(&mut self) -> bool {
        self.form.clear_errors();

        if self.form.value("name").trim().is_empty() {
            self.form.set_error("name", "Product name is required");
        }

        match parse_amount(self.form.value("price")) {
            Some(price) if price > Decimal::ZERO => {
                let sale = self.form.value("special_price").trim();
                if !sale.is_empty() {
                    match parse_amount(sale) {
                        Some(sale) if sale > price => self
                            .form
                            .set_error("special_price", "Sale price cannot exceed the price"),
                        Some(_) => {}
                        None => self
                            .form
                            .set_error("special_price", "Sale price must be a non-negative number"),
                    }
                }
            }
            _ => self.form.set_error("price", "Price must be a positive number"),
        }

        if self.form.value("stock").trim().parse::<u32>().is_err() {
            self.form
                .set_error("stock", "Stock must be a whole number");
        }

        if let Some(tab) = FIELDS
            .iter()
            .find(|spec| self.form.error(spec.name).is_some())
            .map(|spec| spec.tab)
        {
            self.tab = tab;
        }

        !self.form.has_errors()
    }

    /// Render an uploaded file as a `data:` URL preview and switch to the
    /// media tab. Nothing is uploaded anywhere.
    ///
    /// # Errors
    ///
    /// Returns `ImagePreviewError` for empty, oversized or non-image files.
    pub fn attach_image(
        &mut self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), ImagePreviewError> {
        self.tab = EditorTab::Media;
        let preview = image_data_url(content_type, bytes)?;
        self.image_preview = Some(preview);
        Ok(())
    }

    /// Fields on the active tab, with values and errors.
    #[must_use]
    pub fn fields(&self) -> Vec<EditorField> {
        FIELDS
            .iter()
            .filter(|spec| spec.tab == self.tab)
            .map(|spec| EditorField {
                name: spec.name,
                label: spec.label,
                multiline: spec.multiline,
                value: self.form.value(spec.name).to_string(),
                error: self.form.error(spec.name).map(str::to_string),
            })
            .collect()
    }

    /// The tab strip, with the active tab marked.
    #[must_use]
    pub fn tabs(&self) -> Vec<TabLink> {
        EditorTab::ALL
            .into_iter()
            .map(|tab| TabLink {
                slug: tab.slug(),
                label: tab.label(),
                active: tab == self.tab,
            })
            .collect()
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|amount| !amount.is_sign_negative())
}

/// Encode an image as a `data:` URL.
///
/// # Errors
///
/// Returns `ImagePreviewError` for empty, oversized or non-image payloads.
pub fn image_data_url(content_type: &str, bytes: &[u8]) -> Result<String, ImagePreviewError> {
    if bytes.is_empty() {
        return Err(ImagePreviewError::Empty);
    }
    if !content_type.starts_with("image/") {
        return Err(ImagePreviewError::NotAnImage(content_type.to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImagePreviewError::TooLarge {
            max: MAX_IMAGE_BYTES,
        });
    }
    Ok(format!("data:{content_type};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_seeded_with_placeholders() {
        let editor = ProductEditor::seeded("17", EditorTab::General);
        assert_eq!(editor.form.value("sku"), "ACM-WH-1000");
        assert_eq!(editor.form.value("price"), "249.99");
        let names: Vec<&str> = editor.fields().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            ["name", "brand", "category", "short_description", "description"]
        );
    }

    #[test]
    fn test_seeded_placeholders_validate() {
        let mut editor = ProductEditor::seeded("17", EditorTab::General);
        assert!(editor.validate());
    }

    #[test]
    fn test_apply_ignores_unknown_fields() {
        let mut editor = ProductEditor::seeded("17", EditorTab::General);
        editor.apply(&submitted(&[("name", "Studio Monitors"), ("is_admin", "true")]));
        assert_eq!(editor.form.value("name"), "Studio Monitors");
        assert_eq!(editor.form.value("is_admin"), "");
    }

    #[test]
    fn test_validate_numeric_fields_and_jump_to_tab() {
        let mut editor = ProductEditor::seeded("17", EditorTab::General);
        editor.apply(&submitted(&[("stock", "lots"), ("special_price", "999")]));

        assert!(!editor.validate());
        assert_eq!(
            editor.form.error("special_price"),
            Some("Sale price cannot exceed the price")
        );
        assert_eq!(editor.form.error("stock"), Some("Stock must be a whole number"));
        assert_eq!(editor.tab, EditorTab::Pricing);
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let mut editor = ProductEditor::seeded("17", EditorTab::Media);
        editor.apply(&submitted(&[("price", "-1")]));
        assert!(!editor.validate());
        assert_eq!(editor.form.error("price"), Some("Price must be a positive number"));
    }

    #[test]
    fn test_tab_from_slug() {
        assert_eq!(EditorTab::from_slug(Some("pricing")), EditorTab::Pricing);
        assert_eq!(EditorTab::from_slug(Some("nope")), EditorTab::General);
        assert_eq!(EditorTab::from_slug(None), EditorTab::General);
    }

    #[test]
    fn test_image_preview() {
        let mut editor = ProductEditor::seeded("17", EditorTab::General);
        editor.attach_image("image/png", b"\x89PNG").unwrap();
        assert_eq!(editor.tab, EditorTab::Media);
        assert_eq!(
            editor.image_preview.as_deref(),
            Some("data:image/png;base64,iVBORw==")
        );

        assert_eq!(
            image_data_url("text/plain", b"hello"),
            Err(ImagePreviewError::NotAnImage("text/plain".to_string()))
        );
        assert_eq!(image_data_url("image/png", b""), Err(ImagePreviewError::Empty));
    }
}
