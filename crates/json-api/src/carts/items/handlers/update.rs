//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity for the line
    pub quantity: u32,
}

/// Update Cart Item Handler
///
/// Replaces the quantity of a line already in the cart.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not in cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or insufficient stock"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .update_item(
            identity.user,
            product.into_inner().into(),
            json.into_inner().quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.try_into()?))
}

#[cfg(test)]
mod tests {
    use pantry_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        products::records::ProductUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER, carts_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/items/{product}").put(handler))
    }

    #[tokio::test]
    async fn test_update_item_sets_quantity() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .withf(move |user, p, quantity| *user == TEST_USER && *p == product && *quantity == 5)
            .return_once(move |_, _, _| Ok(make_cart(&[(product, 5, 250)])));

        let mut res = TestClient::put(format!("http://example.com/cart/items/{product}"))
            .json(&json!({ "quantity": 5 }))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.subtotal, 1250);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_item_returns_404() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .return_once(move |_, _, _| Err(CartsServiceError::ItemNotFound(product)));

        let res = TestClient::put(format!("http://example.com/cart/items/{product}"))
            .json(&json!({ "quantity": 5 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_to_zero_returns_400() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::InvalidQuantity));

        let res = TestClient::put(format!("http://example.com/cart/items/{product}"))
            .json(&json!({ "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
