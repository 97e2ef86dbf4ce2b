//! Order Status
//!
//! Orders move forward through `pending → processing → shipped → delivered → completed`.
//! `cancelled` is a terminal side branch reachable from any state before `completed`.
//! Which moves are allowed is decided by a [`StatusPolicy`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name a known order status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

/// Returned when a policy refuses a status change.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    /// Status the order currently has
    pub from: OrderStatus,

    /// Status that was requested
    pub to: OrderStatus,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, awaiting payment capture
    Pending,

    /// Paid and being picked
    Processing,

    /// Handed to the carrier
    Shipped,

    /// Received by the customer
    Delivered,

    /// Closed out
    Completed,

    /// Abandoned before completion
    Cancelled,
}

impl OrderStatus {
    /// Every status, lifecycle order first, then `cancelled`.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Stable lowercase name, used for storage and the wire format.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// The next status along the forward lifecycle, if any.
    pub fn successor(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Rule set applied to administrative status changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Any status may be set from any other.
    #[default]
    Permissive,

    /// One step forward at a time, `cancelled` from any non-terminal state, and setting the
    /// current status again as a no-op.
    Strict,
}

impl StatusPolicy {
    /// Check whether `from → to` is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the policy refuses the change.
    pub fn check(self, from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
        let allowed = match self {
            StatusPolicy::Permissive => true,
            StatusPolicy::Strict => {
                from == to
                    || from.successor() == Some(to)
                    || (to == OrderStatus::Cancelled && !from.is_terminal())
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" => Ok(StatusPolicy::Permissive),
            "strict" => Ok(StatusPolicy::Strict),
            other => Err(format!("unknown status policy: {other}")),
        }
    }
}
