//! Payment gateway contract.

use async_trait::async_trait;
use mockall::automock;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::payments::PaymentGatewayError;

/// Request to authorize an amount for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Order the payment belongs to; also used as the idempotency key.
    pub order: Uuid,

    /// Amount in minor currency units.
    pub amount: u64,

    /// Lowercase ISO currency code.
    pub currency: &'static str,

    /// Instrument types the customer may pay with.
    pub instrument_types: SmallVec<[&'static str; 2]>,
}

/// A payment intent created by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAuthorization {
    /// Gateway reference stored on the order.
    pub payment_id: String,

    /// Token the client needs to complete payment.
    pub client_secret: String,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the requested amount.
    async fn authorize(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentAuthorization, PaymentGatewayError>;

    /// Cancel a previously created payment intent.
    async fn cancel(&self, payment_id: &str) -> Result<(), PaymentGatewayError>;
}
