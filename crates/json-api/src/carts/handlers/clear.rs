//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Removes every line from the caller's cart.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart emptied"),
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
        .clear_cart(identity.user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.try_into()?))
}

#[cfg(test)]
mod tests {
    use pantry_app::domain::carts::{MockCartsService, records::CartRecord};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER, carts_service};

    use super::*;

    #[tokio::test]
    async fn test_clear_cart_returns_empty_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .withf(|user| *user == TEST_USER)
            .return_once(|user| Ok(CartRecord::empty(user)));

        let mut res = TestClient::delete("http://example.com/cart")
            .send(&carts_service(carts, Router::with_path("cart").delete(handler)))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.items.is_empty());
        assert_eq!(body.subtotal, 0);

        Ok(())
    }
}
