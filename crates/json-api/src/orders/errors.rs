//! Order Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use pantry_app::{domain::orders::OrdersServiceError, payments::PaymentGatewayError};

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::ValidationFailed { field } => invalid_field(&field),
        OrdersServiceError::ProductNotFound { product } => StatusError::not_found()
            .brief("Product not found")
            .detail(format!("product {product} does not exist")),
        error @ OrdersServiceError::InsufficientStock { .. } => StatusError::bad_request()
            .brief("Insufficient stock")
            .detail(error.to_string()),
        OrdersServiceError::PaymentAuthorizationFailed(source) => {
            warn!("payment authorization failed: {source}");

            let detail = match source {
                PaymentGatewayError::Declined(reason) => reason,
                PaymentGatewayError::Timeout(_)
                | PaymentGatewayError::Http(_)
                | PaymentGatewayError::UnexpectedResponse(_) => {
                    "payment provider unavailable".to_string()
                }
            };

            StatusError::payment_required()
                .brief("Payment authorization failed")
                .detail(detail)
        }
        OrdersServiceError::AlreadyPlaced { order } => StatusError::conflict()
            .brief("Order already placed")
            .detail(format!("order {order} already exists")),
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Order belongs to another user")
        }
        OrdersServiceError::InvalidTransition(source) => StatusError::bad_request()
            .brief("Invalid status transition")
            .detail(source.to_string()),
        OrdersServiceError::StatusConflict => {
            StatusError::conflict().brief("Order status changed concurrently")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// 400 naming the offending field.
pub(crate) fn invalid_field(field: &str) -> StatusError {
    StatusError::bad_request()
        .brief("Invalid order payload")
        .detail(format!("invalid value for `{field}`"))
}
