//! Orders errors.

use pantry::status::TransitionError;
use sqlx::Error;
use thiserror::Error;

use crate::{
    domain::{orders::records::OrderUuid, products::records::ProductUuid},
    payments::PaymentGatewayError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("invalid value for `{field}`")]
    ValidationFailed { field: String },

    #[error("product {product} not found")]
    ProductNotFound { product: ProductUuid },

    #[error("only {available} of product {product} in stock, {requested} requested")]
    InsufficientStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("payment authorization failed")]
    PaymentAuthorizationFailed(#[source] PaymentGatewayError),

    #[error("order {order} was already placed")]
    AlreadyPlaced { order: OrderUuid },

    #[error("order not found")]
    NotFound,

    #[error("order belongs to another user")]
    Forbidden,

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("order status changed concurrently")]
    StatusConflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    pub(crate) fn validation(field: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
        }
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

/// Errors reported by an [`OrdersStore`](crate::domain::orders::OrdersStore).
#[derive(Debug, Error)]
pub enum OrdersStoreError {
    #[error("product {product} not found")]
    ProductNotFound { product: ProductUuid },

    #[error("only {available} of product {product} in stock, {requested} requested")]
    InsufficientStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("order {order} already exists")]
    OrderExists { order: OrderUuid },

    #[error("storage error")]
    Sql(#[from] Error),
}

impl From<OrdersStoreError> for OrdersServiceError {
    fn from(error: OrdersStoreError) -> Self {
        match error {
            OrdersStoreError::ProductNotFound { product } => Self::ProductNotFound { product },
            OrdersStoreError::InsufficientStock {
                product,
                requested,
                available,
            } => Self::InsufficientStock {
                product,
                requested,
                available,
            },
            OrdersStoreError::OrderExists { order } => Self::AlreadyPlaced { order },
            OrdersStoreError::Sql(error) => Self::Sql(error),
        }
    }
}
