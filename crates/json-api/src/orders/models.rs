//! Order request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pantry::addresses::ShippingAddress;
use pantry_app::domain::orders::records::{OrderLineRecord, OrderRecord};

/// Shipping address
///
/// Missing fields are treated as blank and rejected by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AddressBody {
    pub recipient_name: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub phone: String,
}

impl From<AddressBody> for ShippingAddress {
    fn from(body: AddressBody) -> Self {
        ShippingAddress {
            recipient_name: body.recipient_name,
            street: body.street,
            city: body.city,
            region: body.region,
            postal_code: body.postal_code,
            phone: body.phone,
        }
    }
}

impl From<ShippingAddress> for AddressBody {
    fn from(address: ShippingAddress) -> Self {
        AddressBody {
            recipient_name: address.recipient_name,
            street: address.street,
            city: address.city,
            region: address.region,
            postal_code: address.postal_code,
            phone: address.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product: Uuid,
    pub quantity: u32,

    /// Unit price in pence/cents when the order was placed
    pub price: u64,
}

impl From<OrderLineRecord> for OrderItemResponse {
    fn from(line: OrderLineRecord) -> Self {
        OrderItemResponse {
            product: line.product.into(),
            quantity: line.quantity,
            price: line.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub user: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub shipping_address: AddressBody,

    /// `credit_card`, `debit_card` or `paypal`
    pub payment_method: String,

    pub subtotal: u64,
    pub shipping: u64,
    pub total_amount: u64,

    /// Payment gateway reference
    pub payment_id: String,

    /// `pending`, `processing`, `shipped`, `delivered`, `completed` or `cancelled`
    pub status: String,

    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            user: order.user.into(),
            items: order.items.into_iter().map(Into::into).collect(),
            shipping_address: order.shipping_address.into(),
            payment_method: order.payment_method.to_string(),
            subtotal: order.subtotal,
            shipping: order.shipping,
            total_amount: order.total_amount,
            payment_id: order.payment_id,
            status: order.status.to_string(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
}

impl From<Vec<OrderRecord>> for OrdersResponse {
    fn from(orders: Vec<OrderRecord>) -> Self {
        OrdersResponse {
            orders: orders.into_iter().map(Into::into).collect(),
        }
    }
}
