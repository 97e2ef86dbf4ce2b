//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use pantry_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::ValidationFailed { field } => invalid_field(field),
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::Sql(source) => {
            error!("product storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// 400 naming the offending field.
pub(crate) fn invalid_field(field: &str) -> StatusError {
    StatusError::bad_request()
        .brief("Invalid product payload")
        .detail(format!("invalid value for `{field}`"))
}
