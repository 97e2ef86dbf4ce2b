//! Carts service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::products::records::ProductUuid;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductUuid),

    #[error("only {available} of product {product} in stock, {requested} requested")]
    InsufficientStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
