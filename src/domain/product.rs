use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

/// Domain representation of a product with its category resolved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Short description shown in listings.
    pub description: String,
    /// Long-form description, usually markup.
    pub rich_description: String,
    /// Public URL of the primary image.
    pub image: String,
    /// Public URLs of the gallery images, in display order.
    pub images: Vec<String>,
    pub brand: String,
    pub price: f64,
    /// Category the product belongs to.
    pub category: Category,
    /// Units available in stock.
    pub count_in_stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
    /// Whether the product is promoted in featured listings.
    pub is_featured: bool,
    /// Timestamp for when the product record was created.
    #[serde(rename = "dateCreated")]
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    #[serde(rename = "dateUpdated")]
    pub updated_at: NaiveDateTime,
}

/// Client-editable attributes shared by product creation and replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAttributes {
    pub name: String,
    pub description: String,
    pub rich_description: String,
    pub brand: String,
    pub price: f64,
    /// Identifier of the referenced category.
    pub category_id: i32,
    pub count_in_stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub is_featured: bool,
}

impl ProductAttributes {
    /// Build attributes with the required values and defaults for the rest.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category_id: i32,
        count_in_stock: i32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            rich_description: String::new(),
            brand: String::new(),
            price: 0.0,
            category_id,
            count_in_stock,
            rating: 0.0,
            num_reviews: 0,
            is_featured: false,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = is_featured;
        self
    }
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub attributes: ProductAttributes,
    /// Public URL of the uploaded primary image.
    pub image: String,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the current timestamp.
    pub fn new(attributes: ProductAttributes, image: impl Into<String>) -> Self {
        Self {
            attributes,
            image: image.into(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}

/// Full replacement of a product's editable attributes and primary image.
///
/// Every attribute is written; the gallery is left untouched.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub attributes: ProductAttributes,
    /// Primary image URL to store, either freshly uploaded or carried over.
    pub image: String,
    /// Timestamp captured when the replacement was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateProduct {
    pub fn new(attributes: ProductAttributes, image: impl Into<String>) -> Self {
        Self {
            attributes,
            image: image.into(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListQuery {
    /// Restrict results to products in any of these categories.
    pub category_ids: Option<Vec<i32>>,
    /// Only return products flagged as featured.
    pub featured_only: bool,
    /// Maximum number of products to return.
    pub limit: Option<usize>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results to products belonging to any of `category_ids`.
    pub fn in_categories(mut self, category_ids: impl Into<Vec<i32>>) -> Self {
        self.category_ids = Some(category_ids.into());
        self
    }

    /// Only return featured products.
    pub fn featured(mut self) -> Self {
        self.featured_only = true;
        self
    }

    /// Cap the number of returned products.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
