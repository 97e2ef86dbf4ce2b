//! Payments Config

use std::{sync::Arc, time::Duration};

use clap::{Args, ValueEnum};
use pantry_app::payments::{
    PaymentGateway, PaymentGatewayError, SandboxGateway, StripeClient, StripeConfig,
};

/// Which payment gateway backs order placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PaymentsProvider {
    /// In-process gateway that approves every non-zero amount.
    Sandbox,

    /// Stripe-compatible payment intents API.
    Stripe,
}

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Payment gateway (sandbox, stripe)
    #[arg(
        long = "payments-provider",
        env = "PAYMENTS_PROVIDER",
        value_enum,
        default_value_t = PaymentsProvider::Sandbox
    )]
    pub provider: PaymentsProvider,

    /// Payment intents API base URL
    #[arg(
        long = "payments-api-base",
        env = "PAYMENTS_API_BASE",
        default_value = "https://api.stripe.com"
    )]
    pub api_base: String,

    /// Payment gateway secret key
    #[arg(
        long = "payments-secret-key",
        env = "PAYMENTS_SECRET_KEY",
        hide_env_values = true
    )]
    pub secret_key: Option<String>,

    /// Upper bound on a single gateway call, in seconds
    #[arg(
        long = "payments-timeout-seconds",
        env = "PAYMENTS_TIMEOUT_SECONDS",
        default_value_t = 10_u64
    )]
    pub timeout_seconds: u64,
}

impl PaymentsConfig {
    /// Build the configured gateway.
    ///
    /// # Errors
    ///
    /// Returns an error when the Stripe provider is selected without a secret key, or when
    /// its HTTP client cannot be built.
    pub fn gateway(&self) -> Result<Arc<dyn PaymentGateway>, PaymentGatewayError> {
        match self.provider {
            PaymentsProvider::Sandbox => Ok(Arc::new(SandboxGateway)),
            PaymentsProvider::Stripe => {
                let secret_key = self.secret_key.clone().ok_or_else(|| {
                    PaymentGatewayError::UnexpectedResponse(
                        "PAYMENTS_SECRET_KEY is required for the stripe provider".to_string(),
                    )
                })?;

                let client = StripeClient::new(StripeConfig {
                    api_base: self.api_base.clone(),
                    secret_key,
                    timeout: Duration::from_secs(self.timeout_seconds),
                })?;

                Ok(Arc::new(client))
            }
        }
    }
}
