//! Stripe-compatible payment intents client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::payments::{
    PaymentAuthorization, PaymentGateway, PaymentGatewayError, PaymentRequest,
};

/// Configuration for connecting to the payment intents API.
#[derive(Clone)]
pub struct StripeConfig {
    /// API base URL, e.g. `"https://api.stripe.com"`.
    pub api_base: String,

    /// Secret API key.
    pub secret_key: String,

    /// Per-request transport timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_base", &self.api_base)
            .field("secret_key", &"**redacted**")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for creating and cancelling payment intents.
#[derive(Debug, Clone)]
pub struct StripeClient {
    config: StripeConfig,
    http: Client,
}

impl StripeClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StripeConfig) -> Result<Self, PaymentGatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }
}

/// Form fields for a create-intent call.
fn intent_form(request: &PaymentRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), request.amount.to_string()),
        ("currency".to_string(), request.currency.to_string()),
        ("metadata[order_uuid]".to_string(), request.order.to_string()),
    ];

    form.extend(
        request
            .instrument_types
            .iter()
            .map(|kind| ("payment_method_types[]".to_string(), (*kind).to_string())),
    );

    form
}

async fn error_from_response(response: Response, action: &str) -> PaymentGatewayError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorResponse>(&text)
        .ok()
        .and_then(|body| body.error.message);

    match message {
        Some(message) if status.is_client_error() => PaymentGatewayError::Declined(message),
        _ => PaymentGatewayError::UnexpectedResponse(format!(
            "{action} failed with status {status}: {text}"
        )),
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn authorize(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentAuthorization, PaymentGatewayError> {
        let response = self
            .http
            .post(self.url("/v1/payment_intents"))
            .bearer_auth(&self.config.secret_key)
            .header("Idempotency-Key", request.order.to_string())
            .form(&intent_form(&request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "create payment intent").await);
        }

        let parsed: IntentResponse = response.json().await?;

        let client_secret = parsed.client_secret.ok_or_else(|| {
            PaymentGatewayError::UnexpectedResponse(format!(
                "payment intent {} has no client secret",
                parsed.id
            ))
        })?;

        Ok(PaymentAuthorization {
            payment_id: parsed.id,
            client_secret,
        })
    }

    async fn cancel(&self, payment_id: &str) -> Result<(), PaymentGatewayError> {
        let response = self
            .http
            .post(self.url(&format!("/v1/payment_intents/{payment_id}/cancel")))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "cancel payment intent").await);
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn client(api_base: &str) -> Result<StripeClient, PaymentGatewayError> {
        StripeClient::new(StripeConfig {
            api_base: api_base.to_string(),
            secret_key: "sk_test_123".to_string(),
            timeout: Duration::from_secs(1),
        })
    }

    #[test]
    fn test_intent_form_lists_every_instrument() {
        let order = Uuid::nil();

        let form = intent_form(&PaymentRequest {
            order,
            amount: 25_00,
            currency: "usd",
            instrument_types: smallvec!["card", "paypal"],
        });

        assert_eq!(
            form,
            vec![
                ("amount".to_string(), "2500".to_string()),
                ("currency".to_string(), "usd".to_string()),
                ("metadata[order_uuid]".to_string(), order.to_string()),
                ("payment_method_types[]".to_string(), "card".to_string()),
                ("payment_method_types[]".to_string(), "paypal".to_string()),
            ]
        );
    }

    #[test]
    fn test_url_joins_without_double_slash() -> TestResult {
        let client = client("https://api.example.com/")?;

        assert_eq!(
            client.url("/v1/payment_intents"),
            "https://api.example.com/v1/payment_intents"
        );

        Ok(())
    }

    #[test]
    fn test_debug_redacts_secret_key() -> TestResult {
        let client = client("https://api.example.com")?;

        assert!(!format!("{client:?}").contains("sk_test_123"));

        Ok(())
    }

    #[test]
    fn test_error_body_message_is_extracted() -> TestResult {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"error":{"message":"Your card was declined.","type":"card_error"}}"#)?;

        assert_eq!(body.error.message.as_deref(), Some("Your card was declined."));

        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_http_error() -> TestResult {
        let client = client("http://127.0.0.1:9")?;

        let result = client
            .authorize(PaymentRequest {
                order: Uuid::nil(),
                amount: 1_00,
                currency: "usd",
                instrument_types: smallvec!["card"],
            })
            .await;

        assert!(matches!(result, Err(PaymentGatewayError::Http(_))));

        Ok(())
    }
}
