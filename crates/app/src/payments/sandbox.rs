//! In-process gateway for local development.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::payments::{
    PaymentAuthorization, PaymentGateway, PaymentGatewayError, PaymentRequest,
};

/// Approves every non-zero amount without leaving the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SandboxGateway;

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn authorize(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentAuthorization, PaymentGatewayError> {
        if request.amount == 0 {
            return Err(PaymentGatewayError::Declined(
                "amount must be greater than zero".to_string(),
            ));
        }

        let payment_id = format!("sandbox_pi_{}", Uuid::now_v7().simple());
        let client_secret = format!("{payment_id}_secret_{}", Uuid::now_v7().simple());

        info!(
            order = %request.order,
            amount = request.amount,
            payment_id = %payment_id,
            "sandbox payment intent created"
        );

        Ok(PaymentAuthorization {
            payment_id,
            client_secret,
        })
    }

    async fn cancel(&self, payment_id: &str) -> Result<(), PaymentGatewayError> {
        info!(payment_id = %payment_id, "sandbox payment intent cancelled");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn request(amount: u64) -> PaymentRequest {
        PaymentRequest {
            order: Uuid::now_v7(),
            amount,
            currency: "usd",
            instrument_types: smallvec!["card"],
        }
    }

    #[tokio::test]
    async fn test_authorize_returns_secret_tied_to_intent() -> TestResult {
        let authorization = SandboxGateway.authorize(request(12_50)).await?;

        assert!(authorization.payment_id.starts_with("sandbox_pi_"));
        assert!(
            authorization
                .client_secret
                .starts_with(&authorization.payment_id)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_amount_is_declined() {
        let result = SandboxGateway.authorize(request(0)).await;

        assert!(matches!(result, Err(PaymentGatewayError::Declined(_))));
    }
}
