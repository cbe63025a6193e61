use crate::domain::money::{Currency, Money};
use crate::domain::order::{LineItemKind, Order, OrderId};

/// One-shot snapshot of the order attributes fee adjustments key on.
///
/// Built by the processor right before the pricing pass and dropped as soon
/// as the final total is known; adjustments receive it by reference and
/// must not retain it.
#[derive(Debug, Clone)]
pub struct PricingContext {
    pub order_id: OrderId,
    pub customer: String,
    pub method: String,
    pub subtotal: Money,
    pub currency: Currency,
    pub total_quantity: u32,
    pub any_physical: bool,
}

impl PricingContext {
    pub fn snapshot(order: &Order, subtotal: Money) -> Self {
        Self {
            order_id: order.id,
            customer: order.customer.clone(),
            method: order.method.clone(),
            subtotal,
            currency: subtotal.currency(),
            total_quantity: order.items.iter().map(|item| item.quantity).sum(),
            any_physical: order
                .items
                .iter()
                .any(|item| item.kind == LineItemKind::Physical),
        }
    }
}
