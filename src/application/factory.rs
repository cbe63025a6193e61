use crate::domain::money::Money;
use crate::domain::order::Order;
use crate::domain::ports::{AdjustmentRef, FeeAdjustment, StrategyRef};
use crate::domain::pricing::PricingContext;
use crate::error::{ProcessingError, Result};
use std::collections::HashMap;

/// Fee adjustments in resolution order.
///
/// The order is fixed when the factory resolves it: registered priority
/// first (discounts before tax before surcharge by convention: 10/20/30),
/// registration order within equal priorities. The fold is left-to-right,
/// so the chain `[d1, d2]` computes `d2.apply(d1.apply(base))`.
#[derive(Clone)]
pub struct AdjustmentChain {
    adjustments: Vec<AdjustmentRef>,
}

impl AdjustmentChain {
    pub fn apply(&self, base: Money, ctx: &PricingContext) -> Result<Money> {
        let mut total = base;
        for adjustment in &self.adjustments {
            total = adjustment.apply(total, ctx)?;
        }
        Ok(total)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.adjustments.iter().map(|a| a.label()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.adjustments.len()
    }
}

/// What the factory hands the processor for one submission.
pub struct Resolution {
    pub strategy: StrategyRef,
    pub chain: AdjustmentChain,
}

struct AdjustmentEntry {
    tag: String,
    priority: u8,
    adjustment: AdjustmentRef,
}

/// Collects strategy and adjustment registrations during initialization.
///
/// Consumed by `build`, so registration after startup is impossible by
/// construction rather than merely discouraged. Registering a tag twice
/// replaces the earlier entry (and warns).
#[derive(Default)]
pub struct HandlerFactoryBuilder {
    strategies: HashMap<String, StrategyRef>,
    adjustments: Vec<AdjustmentEntry>,
}

impl HandlerFactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_method(&mut self, tag: impl Into<String>, strategy: StrategyRef) {
        let tag = tag.into();
        if self.strategies.insert(tag.clone(), strategy).is_some() {
            tracing::warn!(%tag, "payment method registered twice, last wins");
        }
    }

    pub fn register_adjustment(
        &mut self,
        tag: impl Into<String>,
        adjustment: AdjustmentRef,
        priority: u8,
    ) {
        let tag = tag.into();
        if let Some(existing) = self.adjustments.iter_mut().find(|e| e.tag == tag) {
            tracing::warn!(%tag, "adjustment registered twice, last wins");
            existing.priority = priority;
            existing.adjustment = adjustment;
        } else {
            self.adjustments.push(AdjustmentEntry {
                tag,
                priority,
                adjustment,
            });
        }
    }

    /// Freezes the registration table. Fails when no payment method is
    /// registered at all, which is the one startup-fatal misconfiguration.
    pub fn build(mut self) -> Result<HandlerFactory> {
        if self.strategies.is_empty() {
            return Err(ProcessingError::NoPaymentMethods);
        }
        // Stable sort keeps registration order within a priority band.
        self.adjustments.sort_by_key(|e| e.priority);
        Ok(HandlerFactory {
            strategies: self.strategies,
            adjustments: self.adjustments,
        })
    }
}

/// Immutable tag -> handler registry.
///
/// Write-once at startup, read-many thereafter; `resolve` is a pure
/// function of the order's method tag and line-item attributes, so two
/// resolutions of an unmodified order yield the same strategy and chain.
pub struct HandlerFactory {
    strategies: HashMap<String, StrategyRef>,
    adjustments: Vec<AdjustmentEntry>,
}

impl HandlerFactory {
    pub fn builder() -> HandlerFactoryBuilder {
        HandlerFactoryBuilder::new()
    }

    pub fn resolve(&self, order: &Order) -> Result<Resolution> {
        let strategy = self
            .strategies
            .get(&order.method)
            .cloned()
            .ok_or_else(|| ProcessingError::UnsupportedPaymentMethod(order.method.clone()))?;

        let adjustments: Vec<AdjustmentRef> = self
            .adjustments
            .iter()
            .filter(|entry| entry.adjustment.applies(order))
            .map(|entry| entry.adjustment.clone())
            .collect();

        tracing::debug!(
            order_id = %order.id,
            method = %order.method,
            chain_len = adjustments.len(),
            "resolved payment handler"
        );

        Ok(Resolution {
            strategy,
            chain: AdjustmentChain { adjustments },
        })
    }

    pub fn registered_methods(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }
}
