use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::Category as DomainCategory;
use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};
use crate::models::category::Category;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Category))]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub rich_description: String,
    pub image: String,
    /// JSON array of gallery URLs.
    pub images: String,
    pub brand: String,
    pub price: f64,
    pub category_id: i32,
    pub count_in_stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub rich_description: &'a str,
    pub image: &'a str,
    pub brand: &'a str,
    pub price: f64,
    pub category_id: i32,
    pub count_in_stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub is_featured: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub rich_description: &'a str,
    pub image: &'a str,
    pub brand: &'a str,
    pub price: f64,
    pub category_id: i32,
    pub count_in_stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub is_featured: bool,
    pub updated_at: NaiveDateTime,
}

/// Serialize gallery URLs into the JSON text stored in `products.images`.
pub fn encode_images(urls: &[String]) -> String {
    serde_json::Value::from(urls.to_vec()).to_string()
}

fn decode_images(product_id: i32, raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        log::warn!("Discarding unreadable gallery of product {product_id}: {err}");
        Vec::new()
    })
}

impl From<(Product, Category)> for DomainProduct {
    fn from((value, category): (Product, Category)) -> Self {
        let images = decode_images(value.id, &value.images);
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            rich_description: value.rich_description,
            image: value.image,
            images,
            brand: value.brand,
            price: value.price,
            category: DomainCategory::from(category),
            count_in_stock: value.count_in_stock,
            rating: value.rating,
            num_reviews: value.num_reviews,
            is_featured: value.is_featured,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        let attributes = &value.attributes;
        Self {
            name: attributes.name.as_str(),
            description: attributes.description.as_str(),
            rich_description: attributes.rich_description.as_str(),
            image: value.image.as_str(),
            brand: attributes.brand.as_str(),
            price: attributes.price,
            category_id: attributes.category_id,
            count_in_stock: attributes.count_in_stock,
            rating: attributes.rating,
            num_reviews: attributes.num_reviews,
            is_featured: attributes.is_featured,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        let attributes = &value.attributes;
        Self {
            name: attributes.name.as_str(),
            description: attributes.description.as_str(),
            rich_description: attributes.rich_description.as_str(),
            image: value.image.as_str(),
            brand: attributes.brand.as_str(),
            price: attributes.price,
            category_id: attributes.category_id,
            count_in_stock: attributes.count_in_stock,
            rating: attributes.rating,
            num_reviews: attributes.num_reviews,
            is_featured: attributes.is_featured,
            updated_at: value.updated_at,
        }
    }
}
