use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::parse_identifier;
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::forms::products::{
    GalleryForm, MAX_GALLERY_IMAGES, ProductForm, ProductFormError, ProductSubmission,
};
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::uploads::{UploadStore, accept_image, accept_images};

/// Query parameters accepted by the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Comma-separated category identifiers, e.g. `1,4,7`.
    pub categories: Option<String>,
}

/// Lists products, optionally restricted to the requested categories.
pub fn list_products<R>(repo: &R, query: ProductsQuery) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    let mut list_query = ProductListQuery::new();

    if let Some(raw) = query.categories.as_deref() {
        let category_ids = parse_category_filter(raw)?;
        if !category_ids.is_empty() {
            list_query = list_query.in_categories(category_ids);
        }
    }

    repo.list_products(list_query).map_err(ServiceError::from)
}

/// Loads a single product by its identifier.
pub fn get_product<R>(repo: &R, product_id: &str) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    let product_id = parse_product_id(product_id)?;

    repo.get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a product from a multipart submission carrying its primary image.
///
/// `base_url` is the public uploads prefix the stored filename is appended to.
pub fn create_product<R>(
    repo: &R,
    uploads: &UploadStore,
    user: &AuthenticatedUser,
    form: ProductForm,
    base_url: &str,
) -> ServiceResult<Product>
where
    R: ProductWriter + CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ProductSubmission { attributes, image } = into_submission(form)?;

    let image = image.as_ref().ok_or(ServiceError::MissingImage)?;
    let image = accept_image(image)?;

    ensure_category(repo, attributes.category_id)?;

    let file_name = uploads.store(&image)?;
    let new_product = NewProduct::new(attributes, format!("{base_url}{file_name}"));

    repo.create_product(&new_product).map_err(|err| {
        log::error!("Failed to persist product {}: {err}", new_product.attributes.name);
        uploads.discard(&[file_name]);
        ServiceError::from(err)
    })
}

/// Replaces every editable attribute of an existing product.
///
/// The primary image is replaced only when a new one is uploaded; otherwise
/// the stored URL is carried over. Returns the updated product.
pub fn update_product<R>(
    repo: &R,
    uploads: &UploadStore,
    user: &AuthenticatedUser,
    product_id: &str,
    form: ProductForm,
    base_url: &str,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let product_id = parse_product_id(product_id)?;
    let ProductSubmission { attributes, image } = into_submission(form)?;
    let image = image.as_ref().map(accept_image).transpose()?;

    ensure_category(repo, attributes.category_id)?;

    let existing = repo
        .get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let stored = image.map(|image| uploads.store(&image)).transpose()?;
    let image_url = match stored.as_deref() {
        Some(file_name) => format!("{base_url}{file_name}"),
        None => existing.image,
    };

    let updates = UpdateProduct::new(attributes, image_url);

    repo.update_product(product_id, &updates).map_err(|err| {
        log::error!("Failed to update product {product_id}: {err}");
        if let Some(file_name) = stored {
            uploads.discard(&[file_name]);
        }
        ServiceError::from(err)
    })
}

/// Deletes a product.
pub fn remove_product<R>(repo: &R, user: &AuthenticatedUser, product_id: &str) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let product_id = parse_product_id(product_id)?;

    repo.delete_product(product_id).map_err(ServiceError::from)
}

/// Counts every stored product.
pub fn count_products<R>(repo: &R) -> ServiceResult<usize>
where
    R: ProductReader + ?Sized,
{
    repo.count_products().map_err(ServiceError::from)
}

/// Lists at most `count` featured products. A count of zero yields nothing.
pub fn list_featured_products<R>(repo: &R, count: &str) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    let limit = count.trim().parse::<usize>().map_err(|_| {
        ServiceError::Form(format!("featured count must be a non-negative integer, got `{count}`"))
    })?;

    if limit == 0 {
        return Ok(Vec::new());
    }

    repo.list_products(ProductListQuery::new().featured().limit(limit))
        .map_err(ServiceError::from)
}

/// Overwrites the gallery of a product with the uploaded images, in upload order.
pub fn replace_gallery<R>(
    repo: &R,
    uploads: &UploadStore,
    user: &AuthenticatedUser,
    product_id: &str,
    form: GalleryForm,
    base_url: &str,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let product_id = parse_product_id(product_id)?;

    if form.images.len() > MAX_GALLERY_IMAGES {
        return Err(ServiceError::TooManyFiles {
            max: MAX_GALLERY_IMAGES,
        });
    }

    let images = accept_images(&form.images)?;

    if repo
        .get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::NotFound);
    }

    let stored = uploads.store_all(&images)?;
    let urls: Vec<String> = stored
        .iter()
        .map(|file_name| format!("{base_url}{file_name}"))
        .collect();

    repo.update_product_images(product_id, &urls).map_err(|err| {
        log::error!("Failed to update gallery of product {product_id}: {err}");
        uploads.discard(&stored);
        ServiceError::from(err)
    })
}

/// Parses a comma-separated list of category identifiers, skipping blanks.
pub fn parse_category_filter(raw: &str) -> ServiceResult<Vec<i32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| parse_identifier(value).ok_or(ServiceError::InvalidIdentifier))
        .collect()
}

fn parse_product_id(raw: &str) -> ServiceResult<i32> {
    parse_identifier(raw).ok_or(ServiceError::InvalidIdentifier)
}

fn into_submission(form: ProductForm) -> ServiceResult<ProductSubmission> {
    form.into_submission().map_err(|err| match err {
        ProductFormError::InvalidCategory { .. } => ServiceError::InvalidReference,
        other => ServiceError::Form(other.to_string()),
    })
}

fn ensure_category<R>(repo: &R, category_id: i32) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    match repo
        .get_category_by_id(category_id)
        .map_err(ServiceError::from)?
    {
        Some(_) => Ok(()),
        None => Err(ServiceError::InvalidReference),
    }
}
