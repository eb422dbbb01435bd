pub mod command;
pub mod query;

use shared::errors::{RepositoryError, ServiceError};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Lifts a repository failure, naming the product when the row is missing.
pub fn product_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound(PRODUCT_NOT_FOUND.into()),
        other => ServiceError::Repo(other),
    }
}
