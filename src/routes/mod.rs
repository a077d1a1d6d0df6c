use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::services::ServiceError;
use crate::uploads::public_base_url;

pub mod products;

/// JSON body returned for failed requests and deletions.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Register the product routes. Fixed `/products/get/...` paths come before
/// the `{product_id}` matchers.
pub fn configure_product_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(products::list_products)
        .service(products::count_products)
        .service(products::list_featured_products)
        .service(products::show_product)
        .service(products::add_product)
        .service(products::update_gallery)
        .service(products::update_product)
        .service(products::delete_product);
}

/// Public uploads prefix derived from the scheme and host of the request.
pub fn uploads_base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    public_base_url(info.scheme(), info.host())
}

/// Convert a service failure into its HTTP response.
///
/// Server-side failures are logged and answered with `failure` instead of the
/// underlying error text.
pub fn error_response(err: ServiceError, failure: &str) -> HttpResponse {
    let body = StatusMessage::failure(err.to_string());
    match err {
        ServiceError::InvalidFileType
        | ServiceError::MissingImage
        | ServiceError::TooManyFiles { .. }
        | ServiceError::InvalidReference
        | ServiceError::InvalidIdentifier
        | ServiceError::Form(_) => HttpResponse::BadRequest().json(body),
        ServiceError::Unauthorized => HttpResponse::Unauthorized().json(body),
        ServiceError::NotFound => HttpResponse::NotFound().json(body),
        ServiceError::Upload(_) | ServiceError::PersistenceFailure(_) => {
            log::error!("{failure}: {err}");
            HttpResponse::InternalServerError().json(StatusMessage::failure(failure))
        }
    }
}
