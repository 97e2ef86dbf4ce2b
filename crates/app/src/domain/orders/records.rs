//! Order Records

use jiff::Timestamp;
use pantry::{addresses::ShippingAddress, payment_methods::PaymentMethod, status::OrderStatus};

use crate::{auth::UserUuid, domain::products::records::ProductUuid, uuids::TypedUuid};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// A product, quantity and the unit price frozen when the order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineRecord {
    pub product: ProductUuid,
    pub quantity: u32,

    /// Unit price in minor currency units at order time
    pub price: u64,
}

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub items: Vec<OrderLineRecord>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub subtotal: u64,
    pub shipping: u64,
    pub total_amount: u64,

    /// Payment gateway reference
    pub payment_id: String,

    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A freshly committed order and the token the client needs to complete payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: OrderRecord,
    pub client_secret: String,
}
