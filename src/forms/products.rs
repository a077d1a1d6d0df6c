use std::str::FromStr;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::parse_identifier;
use crate::domain::product::ProductAttributes;

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum number of files accepted by a gallery upload.
pub const MAX_GALLERY_IMAGES: usize = 10;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A required field was absent or blank.
    #[error("`{field}` is required")]
    MissingField { field: &'static str },
    /// A numeric field could not be parsed.
    #[error("`{field}` must be a number, got `{value}`")]
    InvalidNumber { field: &'static str, value: String },
    /// A boolean field could not be parsed.
    #[error("`{field}` must be true or false, got `{value}`")]
    InvalidFlag { field: &'static str, value: String },
    /// The category reference is not a well-formed identifier.
    #[error("invalid category `{value}`")]
    InvalidCategory { value: String },
}

/// Multipart payload used to create or replace a product.
#[derive(MultipartForm)]
pub struct ProductForm {
    /// Primary image; required on creation, optional on replacement.
    #[multipart(limit = "10MB")]
    pub image: Option<TempFile>,
    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    #[multipart(rename = "richDescription")]
    pub rich_description: Option<Text<String>>,
    pub brand: Option<Text<String>>,
    pub price: Option<Text<String>>,
    /// Identifier of the referenced category.
    pub category: Option<Text<String>>,
    #[multipart(rename = "countInStock")]
    pub count_in_stock: Option<Text<String>>,
    pub rating: Option<Text<String>>,
    #[multipart(rename = "numReviews")]
    pub num_reviews: Option<Text<String>>,
    #[multipart(rename = "isFeatured")]
    pub is_featured: Option<Text<String>>,
}

/// Parsed product form: validated attributes and the optional image part.
pub struct ProductSubmission {
    pub attributes: ProductAttributes,
    pub image: Option<TempFile>,
}

/// Typed product fields checked with `validator` before reaching the domain.
#[derive(Debug, Validate)]
struct ProductFields {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    name: String,
    #[validate(length(min = 1))]
    description: String,
    rich_description: String,
    brand: String,
    #[validate(range(min = 0.0))]
    price: f64,
    category_id: i32,
    #[validate(range(min = 0, max = 255))]
    count_in_stock: i32,
    #[validate(range(min = 0.0))]
    rating: f64,
    #[validate(range(min = 0))]
    num_reviews: i32,
    is_featured: bool,
}

impl ProductForm {
    /// Validates and sanitizes the payload into domain attributes.
    ///
    /// Optional fields that are absent or blank take their defaults, so a
    /// replacement built from this form resets anything the client omitted.
    pub fn into_submission(self) -> ProductFormResult<ProductSubmission> {
        let category = required_text(self.category, "category")?;
        let category_id = parse_identifier(&category)
            .ok_or(ProductFormError::InvalidCategory { value: category })?;

        let fields = ProductFields {
            name: sanitize_inline_text(&required_text(self.name, "name")?),
            description: sanitize_multiline_text(&required_text(
                self.description,
                "description",
            )?),
            rich_description: optional_text(self.rich_description).unwrap_or_default(),
            brand: optional_text(self.brand)
                .map(|brand| sanitize_inline_text(&brand))
                .unwrap_or_default(),
            price: parse_amount(self.price, "price")?.unwrap_or(0.0),
            category_id,
            count_in_stock: parse_value(
                required_text(self.count_in_stock, "countInStock")?,
                "countInStock",
            )?,
            rating: parse_amount(self.rating, "rating")?.unwrap_or(0.0),
            num_reviews: parse_number(self.num_reviews, "numReviews")?.unwrap_or(0),
            is_featured: parse_flag(self.is_featured, "isFeatured")?.unwrap_or(false),
        };
        fields.validate()?;

        Ok(ProductSubmission {
            attributes: fields.into(),
            image: self.image,
        })
    }
}

impl From<ProductFields> for ProductAttributes {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            rich_description: fields.rich_description,
            brand: fields.brand,
            price: fields.price,
            category_id: fields.category_id,
            count_in_stock: fields.count_in_stock,
            rating: fields.rating,
            num_reviews: fields.num_reviews,
            is_featured: fields.is_featured,
        }
    }
}

/// Multipart payload replacing a product's gallery.
#[derive(MultipartForm)]
pub struct GalleryForm {
    #[multipart(limit = "10MB")]
    pub images: Vec<TempFile>,
}

fn optional_text(value: Option<Text<String>>) -> Option<String> {
    value
        .map(|text| text.0)
        .filter(|value| !value.trim().is_empty())
}

fn required_text(value: Option<Text<String>>, field: &'static str) -> ProductFormResult<String> {
    optional_text(value).ok_or(ProductFormError::MissingField { field })
}

fn parse_value<T: FromStr>(raw: String, field: &'static str) -> ProductFormResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ProductFormError::InvalidNumber { field, value: raw })
}

fn parse_number<T: FromStr>(
    value: Option<Text<String>>,
    field: &'static str,
) -> ProductFormResult<Option<T>> {
    optional_text(value)
        .map(|raw| parse_value(raw, field))
        .transpose()
}

/// Like [`parse_number`] for floats, rejecting `NaN` and infinities.
fn parse_amount(
    value: Option<Text<String>>,
    field: &'static str,
) -> ProductFormResult<Option<f64>> {
    optional_text(value)
        .map(|raw| match raw.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => Ok(amount),
            _ => Err(ProductFormError::InvalidNumber { field, value: raw }),
        })
        .transpose()
}

fn parse_flag(value: Option<Text<String>>, field: &'static str) -> ProductFormResult<Option<bool>> {
    let Some(raw) = optional_text(value) else {
        return Ok(None);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(Some(true)),
        "false" | "0" | "off" | "no" => Ok(Some(false)),
        _ => Err(ProductFormError::InvalidFlag { field, value: raw }),
    }
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

fn sanitize_multiline_text(input: &str) -> String {
    let lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut previous_empty = true;
    for line in lines {
        if line.is_empty() {
            if !previous_empty {
                result.push(String::new());
            }
            previous_empty = true;
        } else {
            result.push(line);
            previous_empty = false;
        }
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}
