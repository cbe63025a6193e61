use crate::domain::money::Money;
use crate::domain::order::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to an order, with the payload each transition carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventKind {
    /// First acceptance into the lifecycle, published once per order.
    Created,
    Priced { total: Money },
    PaymentSucceeded { total: Money, reference: Option<String> },
    PaymentFailed { reason: String },
    Cancelled,
}

/// Immutable record of a single order transition.
///
/// Events reference the order by id only, never by live reference; per
/// order, publication order equals transition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: OrderId,
    pub at: DateTime<Utc>,
    pub kind: EventKind,
}

impl OrderEvent {
    pub fn now(order_id: OrderId, kind: EventKind) -> Self {
        Self {
            order_id,
            at: Utc::now(),
            kind,
        }
    }
}
