//! Orders Data

use pantry::{addresses::ShippingAddress, payment_methods::PaymentMethod};

use crate::{
    auth::UserUuid,
    domain::{
        orders::{
            errors::OrdersServiceError,
            records::{OrderLineRecord, OrderUuid},
        },
        products::records::ProductUuid,
    },
};

/// A requested product and quantity. Price always comes from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product: ProductUuid,
    pub quantity: u32,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<NewOrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    /// Reject malformed input before anything touches the catalog or the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::ValidationFailed`] naming the first bad field.
    pub fn validate(&self) -> Result<(), OrdersServiceError> {
        if self.items.is_empty() {
            return Err(OrdersServiceError::validation("items"));
        }

        if let Some(index) = self.items.iter().position(|item| item.quantity == 0) {
            return Err(OrdersServiceError::validation(format!(
                "items[{index}].quantity"
            )));
        }

        self.shipping_address.validate().map_err(|missing| {
            OrdersServiceError::validation(format!("shippingAddress.{}", missing.field))
        })
    }
}

/// Everything needed to commit an order once payment is authorized.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOrder {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub items: Vec<OrderLineRecord>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub subtotal: u64,
    pub shipping: u64,
    pub total_amount: u64,
    pub payment_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            recipient_name: "Grace Hopper".to_string(),
            street: "1 Navy Way".to_string(),
            city: "Arlington".to_string(),
            region: "VA".to_string(),
            postal_code: "22202".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn order(items: Vec<NewOrderLine>) -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            items,
            shipping_address: address(),
            payment_method: PaymentMethod::CreditCard,
        }
    }

    fn field(result: Result<(), OrdersServiceError>) -> Option<String> {
        match result {
            Err(OrdersServiceError::ValidationFailed { field }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_valid_order_passes() {
        let order = order(vec![NewOrderLine {
            product: ProductUuid::new(),
            quantity: 1,
        }]);

        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        assert_eq!(field(order(vec![]).validate()), Some("items".to_string()));
    }

    #[test]
    fn test_zero_quantity_reports_index() {
        let order = order(vec![
            NewOrderLine {
                product: ProductUuid::new(),
                quantity: 2,
            },
            NewOrderLine {
                product: ProductUuid::new(),
                quantity: 0,
            },
        ]);

        assert_eq!(field(order.validate()), Some("items[1].quantity".to_string()));
    }

    #[test]
    fn test_blank_address_field_is_reported() {
        let mut order = order(vec![NewOrderLine {
            product: ProductUuid::new(),
            quantity: 1,
        }]);

        order.shipping_address.phone = String::new();

        assert_eq!(
            field(order.validate()),
            Some("shippingAddress.phone".to_string())
        );
    }
}
