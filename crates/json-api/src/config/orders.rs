//! Orders Config

use std::time::Duration;

use clap::Args;
use pantry::status::StatusPolicy;
use pantry_app::domain::orders::OrderSettings;

use crate::config::payments::PaymentsConfig;

/// Order lifecycle settings.
#[derive(Debug, Args)]
pub struct OrdersConfig {
    /// Which status changes administrators may make (permissive, strict)
    #[arg(long, env = "ORDER_STATUS_POLICY", default_value = "permissive")]
    pub status_policy: StatusPolicy,
}

impl OrdersConfig {
    /// Settings handed to the order service.
    #[must_use]
    pub fn settings(&self, payments: &PaymentsConfig) -> OrderSettings {
        OrderSettings {
            payment_timeout: Duration::from_secs(payments.timeout_seconds),
            status_policy: self.status_policy,
        }
    }
}
