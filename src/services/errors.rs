use pushkind_common::repository::errors::RepositoryError;
use thiserror::Error;

use crate::uploads::UploadError;

/// Result type returned by the service layer.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by product services and mapped to HTTP statuses by the routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An uploaded file is not an accepted image type.
    #[error("invalid image type")]
    InvalidFileType,
    /// A product was submitted without its required image.
    #[error("no image in the request")]
    MissingImage,
    /// More gallery files were sent than a product can hold.
    #[error("too many images, at most {max} are accepted")]
    TooManyFiles { max: usize },
    /// The referenced category does not exist.
    #[error("invalid category")]
    InvalidReference,
    /// A record identifier is malformed.
    #[error("invalid identifier")]
    InvalidIdentifier,
    /// Submitted fields failed validation.
    #[error("{0}")]
    Form(String),
    /// The caller lacks the role required for the operation.
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// Storing or removing an uploaded file failed.
    #[error("upload failed: {0}")]
    Upload(String),
    /// The store failed to complete an operation.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::PersistenceFailure(other.to_string()),
        }
    }
}

impl From<UploadError> for ServiceError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidFileType { .. } => ServiceError::InvalidFileType,
            UploadError::Io(err) => ServiceError::Upload(err.to_string()),
        }
    }
}
