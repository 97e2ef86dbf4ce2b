//! Order Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrdersResponse},
    state::State,
};

/// Order Index Handler
///
/// Every order across all users, newest first.
#[endpoint(
    tags("orders"),
    summary = "List All Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "All orders"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let orders = state
        .app
        .orders
        .list_orders()
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into()))
}

#[cfg(test)]
mod tests {
    use pantry_app::{
        auth::UserUuid,
        domain::{
            orders::{MockOrdersService, records::OrderUuid},
            products::records::ProductUuid,
        },
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_ADMIN, TEST_CUSTOMER, make_order, orders_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("orders").get(handler)
    }

    #[tokio::test]
    async fn test_admin_lists_every_order() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().once().return_once(|| {
            Ok(vec![
                make_order(OrderUuid::new(), UserUuid::new(), ProductUuid::new()),
                make_order(OrderUuid::new(), UserUuid::new(), ProductUuid::new()),
            ])
        });

        let body: OrdersResponse = TestClient::get("http://example.com/orders")
            .send(&orders_service(orders, TEST_ADMIN, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(body.orders.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_gets_403() -> TestResult {
        let res = TestClient::get("http://example.com/orders")
            .send(&orders_service(Mocks::default().orders, TEST_CUSTOMER, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
