//! Errors

use salvo::http::StatusError;
use tracing::error;

use pantry_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::ProductNotFound(product) => StatusError::not_found()
            .brief("Product not found")
            .detail(format!("product {product} does not exist")),
        CartsServiceError::ItemNotFound(product) => StatusError::not_found()
            .brief("Cart item not found")
            .detail(format!("product {product} is not in the cart")),
        error @ CartsServiceError::InsufficientStock { .. } => StatusError::bad_request()
            .brief("Insufficient stock")
            .detail(error.to_string()),
        CartsServiceError::InvalidQuantity => StatusError::bad_request()
            .brief("Invalid cart payload")
            .detail("invalid value for `quantity`"),
        CartsServiceError::Sql(source) => {
            error!("cart storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use pantry_app::domain::products::records::ProductUuid;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn test_status_mapping() {
        let product = ProductUuid::new();

        assert_eq!(
            into_status_error(CartsServiceError::ProductNotFound(product)).code,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            into_status_error(CartsServiceError::ItemNotFound(product)).code,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            into_status_error(CartsServiceError::InvalidQuantity).code,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_insufficient_stock_reports_availability() {
        let product = ProductUuid::new();

        let error = into_status_error(CartsServiceError::InsufficientStock {
            product,
            requested: 5,
            available: 2,
        });

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(
            error.detail,
            Some(format!("only 2 of product {product} in stock, 5 requested"))
        );
    }
}
