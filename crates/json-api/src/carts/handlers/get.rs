//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pantry_app::domain::carts::records::{CartLineRecord, CartRecord};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    pub product: Uuid,
    pub name: String,

    /// Current catalog price in pence/cents
    pub price: u64,

    pub quantity: u32,

    /// `price × quantity`
    pub line_total: u64,

    pub image_url: String,

    /// Units currently available
    pub stock: u32,

    pub added_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    pub items: Vec<CartItemResponse>,

    /// Sum of line totals in pence/cents
    pub subtotal: u64,
}

impl TryFrom<CartRecord> for CartResponse {
    type Error = StatusError;

    fn try_from(cart: CartRecord) -> Result<Self, Self::Error> {
        let subtotal = cart
            .subtotal()
            .ok_or("cart subtotal overflowed")
            .or_500("failed to price cart")?;

        let items = cart
            .lines
            .into_iter()
            .map(CartItemResponse::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self { items, subtotal })
    }
}

impl TryFrom<CartLineRecord> for CartItemResponse {
    type Error = StatusError;

    fn try_from(line: CartLineRecord) -> Result<Self, Self::Error> {
        let line_total = line
            .price
            .checked_mul(u64::from(line.quantity))
            .ok_or("cart line total overflowed")
            .or_500("failed to price cart line")?;

        Ok(Self {
            product: line.product.into(),
            name: line.name,
            price: line.price,
            quantity: line.quantity,
            line_total,
            image_url: line.image_url,
            stock: line.stock,
            added_at: line.added_at.to_string(),
        })
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart priced at current catalog prices.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Current cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(identity.user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.try_into()?))
}
