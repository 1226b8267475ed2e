//! Field contracts for every mutating request.
//!
//! Each `*Input` is the raw payload as a client sends it (all fields
//! optional so a missing field can be reported by name rather than as a
//! deserialization failure). [`FormSchema::validate`] turns it into a
//! `*Draft` whose fields are already checked, or names the first field that
//! is wrong. The server runs the same code before any write, and the form
//! controller runs it before issuing a request.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::resource::Resource;
use crate::types::{
    BillboardId, CategoryId, ColorId, HexColor, Price, ProductId, RequiredText, SizeId,
    parse_optional_id,
};

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// camelCase attribute name, as in the JSON payload.
    pub field: String,
    /// Human-readable message, e.g. "Price must be greater than 0".
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for FieldError {}

/// A validation schema shared by server handlers and form controllers.
pub trait FormSchema {
    /// Checked values, ready to persist.
    type Draft;

    /// Which resource this schema belongs to.
    const RESOURCE: Resource;

    /// Check every field in form order and stop at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    fn validate(&self) -> Result<Self::Draft, FieldError>;
}

fn text(field: &str, label: &str, raw: &str) -> Result<RequiredText, FieldError> {
    RequiredText::parse(raw).map_err(|e| FieldError::new(field, format!("{label} {e}")))
}

fn url(field: &str, label: &str, raw: &str) -> Result<RequiredText, FieldError> {
    RequiredText::parse_with_limit(raw, RequiredText::MAX_URL_LENGTH)
        .map_err(|e| FieldError::new(field, format!("{label} {e}")))
}

fn id<T: From<uuid::Uuid>>(field: &str, label: &str, raw: &str) -> Result<T, FieldError> {
    parse_optional_id(raw).map_err(|e| match e {
        None => FieldError::new(field, format!("{label} is required")),
        Some(_) => FieldError::new(field, format!("{label} is not a valid id")),
    })
}

/// Accept a price as a JSON number or string, keeping the raw text so a bad
/// value is reported against the `price` field.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Treat an explicit `null` like a missing field, so it is reported by
/// [`FormSchema::validate`] under the field's name.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreInput {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDraft {
    pub name: RequiredText,
}

impl FormSchema for StoreInput {
    type Draft = StoreDraft;
    const RESOURCE: Resource = Resource::Store;

    fn validate(&self) -> Result<StoreDraft, FieldError> {
        Ok(StoreDraft {
            name: text("name", "Name", &self.name)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillboardInput {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillboardDraft {
    pub label: RequiredText,
    pub image_url: RequiredText,
}

impl FormSchema for BillboardInput {
    type Draft = BillboardDraft;
    const RESOURCE: Resource = Resource::Billboard;

    fn validate(&self) -> Result<BillboardDraft, FieldError> {
        Ok(BillboardDraft {
            label: text("label", "Label", &self.label)?,
            image_url: url("imageUrl", "Background image", &self.image_url)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryInput {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub billboard_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: RequiredText,
    pub billboard_id: BillboardId,
}

impl FormSchema for CategoryInput {
    type Draft = CategoryDraft;
    const RESOURCE: Resource = Resource::Category;

    fn validate(&self) -> Result<CategoryDraft, FieldError> {
        Ok(CategoryDraft {
            name: text("name", "Name", &self.name)?,
            billboard_id: id("billboardId", "Billboard", &self.billboard_id)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizeInput {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeDraft {
    pub name: RequiredText,
    pub value: RequiredText,
}

impl FormSchema for SizeInput {
    type Draft = SizeDraft;
    const RESOURCE: Resource = Resource::Size;

    fn validate(&self) -> Result<SizeDraft, FieldError> {
        Ok(SizeDraft {
            name: text("name", "Name", &self.name)?,
            value: text("value", "Value", &self.value)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorInput {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDraft {
    pub name: RequiredText,
    pub value: HexColor,
}

impl FormSchema for ColorInput {
    type Draft = ColorDraft;
    const RESOURCE: Resource = Resource::Color;

    fn validate(&self) -> Result<ColorDraft, FieldError> {
        Ok(ColorDraft {
            name: text("name", "Name", &self.name)?,
            value: HexColor::parse(&self.value)
                .map_err(|e| FieldError::new("value", format!("Value {e}")))?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient_decimal")]
    pub price: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub category_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<ImageInput>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_archived: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: RequiredText,
    pub price: Price,
    pub category_id: CategoryId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    pub image_urls: Vec<RequiredText>,
    pub is_featured: bool,
    pub is_archived: bool,
}

impl FormSchema for ProductInput {
    type Draft = ProductDraft;
    const RESOURCE: Resource = Resource::Product;

    fn validate(&self) -> Result<ProductDraft, FieldError> {
        if self.images.is_empty() {
            return Err(FieldError::new("images", "At least one image is required"));
        }
        let image_urls = self
            .images
            .iter()
            .map(|image| url("images", "Image URL", &image.url))
            .collect::<Result<Vec<_>, _>>()?;
        let name = text("name", "Name", &self.name)?;
        let raw_price = self
            .price
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| FieldError::new("price", "Price is required"))?;
        let price =
            Price::parse(raw_price).map_err(|e| FieldError::new("price", capitalize(&e)))?;
        Ok(ProductDraft {
            name,
            price,
            category_id: id("categoryId", "Category", &self.category_id)?,
            size_id: id("sizeId", "Size", &self.size_id)?,
            color_id: id("colorId", "Color", &self.color_id)?,
            image_urls,
            is_featured: self.is_featured,
            is_archived: self.is_archived,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderInput {
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub phone: RequiredText,
    pub address: RequiredText,
    pub product_ids: Vec<ProductId>,
    pub is_paid: bool,
}

impl FormSchema for OrderInput {
    type Draft = OrderDraft;
    const RESOURCE: Resource = Resource::Order;

    fn validate(&self) -> Result<OrderDraft, FieldError> {
        let phone = text("phone", "Phone", &self.phone)?;
        let address = text("address", "Address", &self.address)?;
        if self.product_ids.is_empty() {
            return Err(FieldError::new(
                "productIds",
                "At least one product is required",
            ));
        }
        let product_ids = self
            .product_ids
            .iter()
            .map(|raw| id("productIds", "Product", raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OrderDraft {
            phone,
            address,
            product_ids,
            is_paid: self.is_paid,
        })
    }
}

fn capitalize(err: &impl fmt::Display) -> String {
    let message = err.to_string();
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_input() -> ProductInput {
        ProductInput {
            name: "Tee".to_owned(),
            price: Some("19.99".to_owned()),
            category_id: uuid::Uuid::new_v4().to_string(),
            size_id: uuid::Uuid::new_v4().to_string(),
            color_id: uuid::Uuid::new_v4().to_string(),
            images: vec![ImageInput {
                url: "https://cdn.example.com/tee.png".to_owned(),
            }],
            is_featured: true,
            is_archived: false,
        }
    }

    #[test]
    fn test_billboard_missing_label_names_field() {
        let input: BillboardInput =
            serde_json::from_str(r#"{"imageUrl":"https://x/y.png"}"#).unwrap();
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "label");
        assert_eq!(err.message, "Label is required");
    }

    #[test]
    fn test_null_field_is_reported_as_missing() {
        let input: BillboardInput =
            serde_json::from_str(r#"{"label":null,"imageUrl":"https://x/y.png"}"#).unwrap();
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "label");
        assert_eq!(err.message, "Label is required");

        let mut json = serde_json::to_value(product_input()).unwrap();
        json["categoryId"] = serde_json::Value::Null;
        json["isFeatured"] = serde_json::Value::Null;
        let input: ProductInput = serde_json::from_value(json).unwrap();
        assert!(!input.is_featured);
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "categoryId");
        assert_eq!(err.message, "Category is required");
    }

    #[test]
    fn test_billboard_valid() {
        let input = BillboardInput {
            label: " Summer ".to_owned(),
            image_url: "https://x/y.png".to_owned(),
        };
        let draft = input.validate().unwrap();
        assert_eq!(draft.label.as_str(), "Summer");
    }

    #[test]
    fn test_category_requires_billboard() {
        let input = CategoryInput {
            name: "Shirts".to_owned(),
            billboard_id: String::new(),
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "billboardId");
        assert_eq!(err.message, "Billboard is required");

        let input = CategoryInput {
            name: "Shirts".to_owned(),
            billboard_id: "nope".to_owned(),
        };
        assert_eq!(input.validate().unwrap_err().field, "billboardId");
    }

    #[test]
    fn test_color_value_must_be_hex() {
        let input = ColorInput {
            name: "Red".to_owned(),
            value: "red".to_owned(),
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "value");
    }

    #[test]
    fn test_product_negative_price_from_json_number() {
        let mut json = serde_json::to_value(product_input()).unwrap();
        json["price"] = serde_json::json!(-5);
        let input: ProductInput = serde_json::from_value(json).unwrap();
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "price");
        assert_eq!(err.message, "Price must be greater than 0");
    }

    #[test]
    fn test_product_zero_and_missing_price() {
        let mut input = product_input();
        input.price = Some("0".to_owned());
        assert_eq!(input.validate().unwrap_err().field, "price");
        input.price = None;
        let err = input.validate().unwrap_err();
        assert_eq!(err.message, "Price is required");
        input.price = Some("cheap".to_owned());
        assert_eq!(input.validate().unwrap_err().message, "Price must be a number");
    }

    #[test]
    fn test_product_requires_images() {
        let mut input = product_input();
        input.images.clear();
        assert_eq!(input.validate().unwrap_err().field, "images");
        input.images.push(ImageInput { url: " ".to_owned() });
        assert_eq!(input.validate().unwrap_err().field, "images");
    }

    #[test]
    fn test_product_flags_default_false() {
        let input: ProductInput = serde_json::from_str(r#"{"name":"Tee"}"#).unwrap();
        assert!(!input.is_featured);
        assert!(!input.is_archived);
    }

    #[test]
    fn test_product_valid() {
        let draft = product_input().validate().unwrap();
        assert_eq!(draft.price.to_string(), "19.99");
        assert_eq!(draft.image_urls.len(), 1);
        assert!(draft.is_featured);
    }

    #[test]
    fn test_order_requires_products() {
        let input = OrderInput {
            phone: "555-0100".to_owned(),
            address: "1 Main St".to_owned(),
            product_ids: vec![],
            is_paid: false,
        };
        assert_eq!(input.validate().unwrap_err().field, "productIds");
    }

    #[test]
    fn test_store_name_required() {
        let err = StoreInput::default().validate().unwrap_err();
        assert_eq!(err.field, "name");
    }
}
