//! Concrete fee adjustments: bulk discount, tax, shipping surcharge.
//!
//! Selection happens at factory resolution time through `applies`; the
//! conventional priorities (discount 10, tax 20, surcharge 30) make tax
//! apply after discounts and the surcharge last.

use crate::domain::money::Money;
use crate::domain::order::{LineItemKind, Order};
use crate::domain::ports::FeeAdjustment;
use crate::domain::pricing::PricingContext;
use crate::error::Result;
use rust_decimal::Decimal;

/// Percent off the running total once the order reaches a quantity
/// threshold.
pub struct BulkDiscount {
    label: String,
    rate: Decimal,
    min_quantity: u32,
}

impl BulkDiscount {
    pub fn new(label: impl Into<String>, rate: Decimal, min_quantity: u32) -> Self {
        Self {
            label: label.into(),
            rate,
            min_quantity,
        }
    }
}

impl FeeAdjustment for BulkDiscount {
    fn label(&self) -> &str {
        &self.label
    }

    fn applies(&self, order: &Order) -> bool {
        let quantity: u32 = order.items.iter().map(|item| item.quantity).sum();
        quantity >= self.min_quantity
    }

    fn apply(&self, base: Money, _ctx: &PricingContext) -> Result<Money> {
        base.apply_rate(Decimal::ONE - self.rate)
    }
}

/// Flat tax rate on the running (post-discount) total.
pub struct TaxAdjustment {
    label: String,
    rate: Decimal,
}

impl TaxAdjustment {
    pub fn new(label: impl Into<String>, rate: Decimal) -> Self {
        Self {
            label: label.into(),
            rate,
        }
    }
}

impl FeeAdjustment for TaxAdjustment {
    fn label(&self) -> &str {
        &self.label
    }

    fn apply(&self, base: Money, _ctx: &PricingContext) -> Result<Money> {
        base.apply_rate(Decimal::ONE + self.rate)
    }
}

/// Flat shipping fee, skipped entirely for all-digital orders.
pub struct ShippingSurcharge {
    label: String,
    fee: Money,
}

impl ShippingSurcharge {
    pub fn new(label: impl Into<String>, fee: Money) -> Self {
        Self {
            label: label.into(),
            fee,
        }
    }
}

impl FeeAdjustment for ShippingSurcharge {
    fn label(&self) -> &str {
        &self.label
    }

    fn applies(&self, order: &Order) -> bool {
        order
            .items
            .iter()
            .any(|item| item.kind == LineItemKind::Physical)
    }

    fn apply(&self, base: Money, _ctx: &PricingContext) -> Result<Money> {
        base.try_add(self.fee)
    }
}
