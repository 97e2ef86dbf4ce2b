//! Payment Methods

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name a supported payment method.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

/// How the customer intends to pay for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit card
    CreditCard,

    /// Debit card
    DebitCard,

    /// `PayPal` wallet
    Paypal,
}

impl PaymentMethod {
    /// Stable name, used for storage and the wire format.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Paypal => "paypal",
        }
    }

    /// Payment instrument types the gateway should accept for this method.
    pub fn instrument_types(self) -> &'static [&'static str] {
        match self {
            PaymentMethod::CreditCard | PaymentMethod::DebitCard => &["card"],
            PaymentMethod::Paypal => &["paypal"],
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}
