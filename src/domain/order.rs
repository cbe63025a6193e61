use crate::domain::money::Money;
use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque unique order identifier.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether a line item needs physical fulfilment.
///
/// Digital-only orders skip the shipping surcharge at factory resolution
/// time, so the distinction has to live on the item itself.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineItemKind {
    #[default]
    Physical,
    Digital,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LineItem {
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(default)]
    pub kind: LineItemKind,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Created,
    Priced,
    Paid,
    Failed,
    Cancelled,
}

impl OrderStatus {
    /// Paid and Cancelled admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }
}

/// The entity under management: owns its line items and status.
///
/// Callers construct orders; only the processor mutates them (the state
/// mutators are crate-private). The processor holds no reference past a
/// call, so an order is freed whenever its owner drops it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    #[serde(default)]
    pub id: OrderId,
    pub customer: String,
    /// Payment-method tag resolved by the handler factory.
    pub method: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total: Option<Money>,
}

impl Order {
    pub fn new(customer: impl Into<String>, method: impl Into<String>, items: Vec<LineItem>) -> Self {
        Self {
            id: OrderId::new(),
            customer: customer.into(),
            method: method.into(),
            items,
            status: OrderStatus::Created,
            total: None,
        }
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// The priced total, present once the order has reached `Priced`.
    pub fn total(&self) -> Option<Money> {
        self.total
    }

    /// Shape validation: a submittable order has at least one line item and
    /// every quantity is at least 1. Currency consistency is not checked
    /// here; mixed currencies surface as `CurrencyMismatch` during pricing.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(ProcessingError::InvalidOrder(
                "order has no line items".to_string(),
            ));
        }
        for item in &self.items {
            if item.quantity < 1 {
                return Err(ProcessingError::InvalidOrder(format!(
                    "line item {} has quantity 0",
                    item.sku
                )));
            }
        }
        Ok(())
    }

    /// Sum of `unit_price * quantity` over all line items.
    pub fn subtotal(&self) -> Result<Money> {
        let mut items = self.items.iter();
        let first = items.next().ok_or_else(|| {
            ProcessingError::InvalidOrder("order has no line items".to_string())
        })?;
        let mut subtotal = first.unit_price.times(first.quantity)?;
        for item in items {
            subtotal = subtotal.try_add(item.unit_price.times(item.quantity)?)?;
        }
        Ok(subtotal)
    }

    fn transition(&mut self, to: OrderStatus, allowed_from: &[OrderStatus]) -> Result<()> {
        if allowed_from.contains(&self.status) {
            self.status = to;
            Ok(())
        } else {
            Err(ProcessingError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }

    /// Created -> Priced, or Failed -> Priced on resubmission.
    pub(crate) fn mark_priced(&mut self, total: Money) -> Result<()> {
        self.transition(OrderStatus::Priced, &[OrderStatus::Created, OrderStatus::Failed])?;
        self.total = Some(total);
        Ok(())
    }

    pub(crate) fn mark_paid(&mut self) -> Result<()> {
        self.transition(OrderStatus::Paid, &[OrderStatus::Priced])
    }

    pub(crate) fn mark_failed(&mut self) -> Result<()> {
        self.transition(OrderStatus::Failed, &[OrderStatus::Priced])
    }

    /// Any non-terminal state -> Cancelled.
    pub(crate) fn mark_cancelled(&mut self) -> Result<()> {
        self.transition(
            OrderStatus::Cancelled,
            &[OrderStatus::Created, OrderStatus::Priced, OrderStatus::Failed],
        )
    }
}
