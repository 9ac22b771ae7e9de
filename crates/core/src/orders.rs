//! Order status state machine and order number generation.
//!
//! Orders are created by webhook ingestion and advanced by admin status
//! updates. The admin path enforces the transition table below;
//! `delivered`, `failed`, and `refunded` are terminal. The webhook
//! refund path intentionally bypasses this table (see the ingestor).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Length of the random suffix appended to generated order numbers.
const ORDER_SUFFIX_LENGTH: usize = 4;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Delivered,
    Refunded,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "processing" => Ok(OrderStatus::Processing),
            "delivered" => Ok(OrderStatus::Delivered),
            "refunded" => Ok(OrderStatus::Refunded),
            "failed" => Ok(OrderStatus::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown order status: {other}"
            ))),
        }
    }

    /// Whether no further admin-initiated transition is permitted.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Refunded | OrderStatus::Failed
        )
    }

    /// Statuses this one may legally move to via the admin path.
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Paid, OrderStatus::Failed],
            OrderStatus::Paid => &[
                OrderStatus::Processing,
                OrderStatus::Failed,
                OrderStatus::Refunded,
            ],
            OrderStatus::Processing => &[
                OrderStatus::Delivered,
                OrderStatus::Failed,
                OrderStatus::Refunded,
            ],
            OrderStatus::Delivered | OrderStatus::Refunded | OrderStatus::Failed => &[],
        }
    }
}

/// Validate an admin-initiated status transition.
///
/// Returns `CoreError::Conflict` for moves out of a terminal status or
/// any move not in the transition table. Same-status "transitions" are
/// rejected too; callers should treat them as no-ops before calling.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), CoreError> {
    if from.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Order status {} is terminal and cannot be changed",
            from.as_str()
        )));
    }
    if !from.allowed_transitions().contains(&to) {
        return Err(CoreError::Conflict(format!(
            "Illegal order status transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(())
}

/// Generate a human-facing order number: a UTC second-resolution
/// timestamp plus a short random alphanumeric suffix. Collisions are
/// treated as negligible, not defended against.
pub fn generate_order_number(now: Timestamp) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(ORDER_SUFFIX_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();

    format!("ORD-{}-{}", now.format("%Y%m%d%H%M%S"), suffix)
}
