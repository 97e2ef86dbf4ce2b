//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pantry::payment_methods::PaymentMethod;
use pantry_app::domain::orders::{
    OrdersServiceError,
    data::{NewOrder, NewOrderLine},
    records::OrderUuid,
};

use crate::{
    extensions::*,
    observability::{record_order_placed, record_payment_failure},
    orders::{
        errors::{into_status_error, invalid_field},
        models::{AddressBody, OrderResponse},
    },
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemRequest {
    pub product: Uuid,
    pub quantity: u32,
}

/// Place Order Request
///
/// Prices are always taken from the catalog, never from the request. The order uuid is
/// always minted by the server since it doubles as the payment idempotency key.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,

    #[serde(default)]
    pub shipping_address: AddressBody,

    /// `credit_card`, `debit_card` or `paypal`
    pub payment_method: String,
}

impl TryFrom<PlaceOrderRequest> for NewOrder {
    type Error = StatusError;

    fn try_from(request: PlaceOrderRequest) -> Result<Self, Self::Error> {
        let payment_method = request
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|_ignored| invalid_field("paymentMethod"))?;

        Ok(NewOrder {
            uuid: OrderUuid::new(),
            items: request
                .items
                .into_iter()
                .map(|item| NewOrderLine {
                    product: item.product.into(),
                    quantity: item.quantity,
                })
                .collect(),
            shipping_address: request.shipping_address.into(),
            payment_method,
        })
    }
}

/// Order Placed Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderPlacedResponse {
    pub order: OrderResponse,

    /// Token the client uses to complete payment with the provider
    pub client_secret: String,
}

/// Place Order Handler
///
/// Checks availability, authorizes payment for the total and reserves stock.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order or insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Payment authorization failed"),
        (status_code = StatusCode::CONFLICT, description = "Order already placed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty,
        items_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderPlacedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let order: NewOrder = json.into_inner().try_into()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(identity.user));
    span.record("order_uuid", tracing::field::display(order.uuid));
    span.record("items_count", order.items.len());

    let placed = match state.app.orders.place_order(identity.user, order).await {
        Ok(placed) => placed,
        Err(error) => {
            if matches!(error, OrdersServiceError::PaymentAuthorizationFailed(_)) {
                record_payment_failure();
            }

            return Err(into_status_error(error));
        }
    };

    record_order_placed();

    let uuid = placed.order.uuid;

    res.add_header(LOCATION, format!("/orders/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(
        order_uuid = %uuid,
        total_amount = placed.order.total_amount,
        "placed order"
    );

    Ok(Json(OrderPlacedResponse {
        order: placed.order.into(),
        client_secret: placed.client_secret,
    }))
}

#[cfg(test)]
mod tests {
    use pantry_app::{
        domain::{
            orders::{MockOrdersService, records::PlacedOrder},
            products::records::ProductUuid,
        },
        payments::PaymentGatewayError,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::test_helpers::{
        Mocks, TEST_CUSTOMER, TEST_USER, make_address, make_order, orders_service,
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, TEST_CUSTOMER, Router::with_path("orders").post(handler))
    }

    fn body(product: ProductUuid) -> Value {
        json!({
            "items": [{ "product": product.into_uuid(), "quantity": 2 }],
            "shippingAddress": {
                "recipientName": "Grace Hopper",
                "street": "1 Navy Way",
                "city": "Arlington",
                "region": "VA",
                "postalCode": "22202",
                "phone": "555-0100"
            },
            "paymentMethod": "credit_card"
        })
    }

    #[tokio::test]
    async fn test_place_order_returns_201_with_client_secret() -> TestResult {
        let product = ProductUuid::new();
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(move |user, order| {
                *user == TEST_USER
                    && order.items
                        == vec![NewOrderLine {
                            product,
                            quantity: 2,
                        }]
                    && order.shipping_address == make_address()
                    && order.payment_method == PaymentMethod::CreditCard
            })
            .return_once(move |user, _| {
                Ok(PlacedOrder {
                    order: make_order(uuid, user, product),
                    client_secret: "pi_test_secret".to_string(),
                })
            });

        let mut res = TestClient::post("http://example.com/orders")
            .json(&body(product))
            .send(&make_service(orders))
            .await;

        let response: Value = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}").as_str()));
        assert_eq!(response["clientSecret"], "pi_test_secret");
        assert_eq!(response["order"]["totalAmount"], 1500);
        assert_eq!(response["order"]["status"], "pending");
        assert_eq!(response["order"]["paymentMethod"], "credit_card");
        assert_eq!(response["order"]["shippingAddress"]["postalCode"], "22202");
        assert_eq!(response["order"]["items"][0]["price"], 250);

        Ok(())
    }

    #[tokio::test]
    async fn test_client_supplied_uuid_is_ignored() -> TestResult {
        let product = ProductUuid::new();
        let supplied = Uuid::now_v7();

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(move |_, order| order.uuid.into_uuid() != supplied)
            .return_once(move |user, order| {
                Ok(PlacedOrder {
                    order: make_order(order.uuid, user, product),
                    client_secret: "pi_test_secret".to_string(),
                })
            });

        let mut request = body(product);

        request["uuid"] = json!(supplied);

        let mut res = TestClient::post("http://example.com/orders")
            .json(&request)
            .send(&make_service(orders))
            .await;

        let response: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_ne!(response["order"]["uuid"], json!(supplied));

        Ok(())
    }

    #[tokio::test]
    async fn test_already_placed_order_returns_409() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_, order| Err(OrdersServiceError::AlreadyPlaced { order: order.uuid }));

        let res = TestClient::post("http://example.com/orders")
            .json(&body(ProductUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_method_returns_400_without_calling_service() -> TestResult {
        let mut request = body(ProductUuid::new());

        request["paymentMethod"] = json!("cheque");

        let res = TestClient::post("http://example.com/orders")
            .json(&request)
            .send(&make_service(Mocks::default().orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_address_field_reaches_validation() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|_, order| order.shipping_address.phone.is_empty())
            .return_once(|_, _| {
                Err(OrdersServiceError::ValidationFailed {
                    field: "shippingAddress.phone".to_string(),
                })
            });

        let mut request = body(ProductUuid::new());

        if let Some(address) = request["shippingAddress"].as_object_mut() {
            address.remove("phone");
        }

        let res = TestClient::post("http://example.com/orders")
            .json(&request)
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_stock_returns_400() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders.expect_place_order().once().return_once(move |_, _| {
            Err(OrdersServiceError::InsufficientStock {
                product,
                requested: 2,
                available: 1,
            })
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&body(product))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_declined_payment_returns_402() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_place_order().once().return_once(|_, _| {
            Err(OrdersServiceError::PaymentAuthorizationFailed(
                PaymentGatewayError::Declined("insufficient_funds".to_string()),
            ))
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&body(ProductUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::PAYMENT_REQUIRED));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_404() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(move |_, _| Err(OrdersServiceError::ProductNotFound { product }));

        let res = TestClient::post("http://example.com/orders")
            .json(&body(product))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
