use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::forms::products::{GalleryForm, ProductForm};
use crate::repository::DieselRepository;
use crate::routes::{StatusMessage, error_response, uploads_base_url};
use crate::services::{ServiceError, ServiceResult, products};
use crate::uploads::UploadStore;

#[get("/products")]
pub async fn list_products(
    params: web::Query<products::ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_products(repo.get_ref(), params.into_inner()) {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => error_response(err, "the products cannot be listed"),
    }
}

#[get("/products/get/count")]
pub async fn count_products(repo: web::Data<DieselRepository>) -> impl Responder {
    match products::count_products(repo.get_ref()) {
        Ok(count) => HttpResponse::Ok().json(json!({ "productCount": count })),
        Err(err) => error_response(err, "the products cannot be counted"),
    }
}

#[get("/products/get/featured/{count}")]
pub async fn list_featured_products(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_featured_products(repo.get_ref(), &path.into_inner()) {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => error_response(err, "the featured products cannot be listed"),
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::get_product(repo.get_ref(), &path.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "the product cannot be loaded"),
    }
}

#[post("/products")]
pub async fn add_product(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStore>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> impl Responder {
    let base_url = uploads_base_url(&req);

    match products::create_product(repo.get_ref(), uploads.get_ref(), &user, form, &base_url) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "the product cannot be created"),
    }
}

#[put("/products/gallery-images/{product_id}")]
pub async fn update_gallery(
    req: HttpRequest,
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStore>,
    MultipartForm(form): MultipartForm<GalleryForm>,
) -> impl Responder {
    let base_url = uploads_base_url(&req);
    let product_id = path.into_inner();

    match products::replace_gallery(
        repo.get_ref(),
        uploads.get_ref(),
        &user,
        &product_id,
        form,
        &base_url,
    ) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "the gallery cannot be updated"),
    }
}

#[put("/products/{product_id}")]
pub async fn update_product(
    req: HttpRequest,
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStore>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> impl Responder {
    let base_url = uploads_base_url(&req);
    let product_id = path.into_inner();

    match products::update_product(
        repo.get_ref(),
        uploads.get_ref(),
        &user,
        &product_id,
        form,
        &base_url,
    ) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "the product cannot be updated"),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    deletion_response(products::remove_product(repo.get_ref(), &user, &product_id))
}

/// Status body for a deletion: `success` is false when nothing was removed.
fn deletion_response(result: ServiceResult<()>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(StatusMessage::success("the product is deleted")),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(StatusMessage::failure("product not found!"))
        }
        Err(err) => error_response(err, "the product cannot be deleted"),
    }
}
