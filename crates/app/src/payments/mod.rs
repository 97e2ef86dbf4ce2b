//! Payment gateway integration.
//!
//! Orders ask the gateway for a payment intent before anything is committed. The gateway
//! answers with an opaque intent id, stored on the order, and a client secret the storefront
//! uses to complete capture on its side.

mod errors;
mod gateway;
mod sandbox;
mod stripe;

pub use errors::PaymentGatewayError;
pub use gateway::*;
pub use sandbox::SandboxGateway;
pub use stripe::{StripeClient, StripeConfig};
