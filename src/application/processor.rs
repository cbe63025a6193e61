use crate::application::bus::NotificationBus;
use crate::application::factory::HandlerFactory;
use crate::domain::event::{EventKind, OrderEvent};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::payment::PaymentResult;
use crate::domain::ports::PaymentStrategy;
use crate::domain::pricing::PricingContext;
use crate::error::{ProcessingError, Result};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_AUTHORIZE_TIMEOUT: Duration = Duration::from_millis(1500);

/// The main entry point for order processing.
///
/// `OrderProcessor` orchestrates validation, pricing, payment and status
/// transitions, and publishes one event per transition after the status
/// field is updated. It holds only shared immutable collaborators, so one
/// instance serves many concurrent submissions; serializing operations on a
/// single `Order` is the caller's job, which `&mut Order` encodes directly.
pub struct OrderProcessor {
    factory: Arc<HandlerFactory>,
    bus: Arc<NotificationBus>,
    authorize_timeout: Duration,
}

impl OrderProcessor {
    pub fn new(factory: Arc<HandlerFactory>, bus: Arc<NotificationBus>) -> Self {
        Self {
            factory,
            bus,
            authorize_timeout: DEFAULT_AUTHORIZE_TIMEOUT,
        }
    }

    /// Bounds every `authorize` call; an elapsed timeout is a payment
    /// `Error`, not a crate error.
    pub fn with_authorize_timeout(mut self, timeout: Duration) -> Self {
        self.authorize_timeout = timeout;
        self
    }

    pub fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    /// Drives one submission to its terminal event.
    ///
    /// A fresh order enters at `Created`; a failed one re-enters at
    /// `Priced` with its price recomputed, since discounts or rates may
    /// have changed between attempts. Declines and gateway faults resolve
    /// to `Ok` with a `PaymentFailed` event: the order is resubmittable and
    /// the library has nothing to signal. Validation, resolution, and
    /// pricing faults return `Err` with the order's status untouched and
    /// zero events published.
    pub async fn submit_order(&self, order: &mut Order) -> Result<OrderEvent> {
        let entry_status = order.status();
        if !matches!(entry_status, OrderStatus::Created | OrderStatus::Failed) {
            return Err(ProcessingError::InvalidTransition {
                from: entry_status,
                to: OrderStatus::Priced,
            });
        }

        order.validate()?;
        let resolution = self.factory.resolve(order)?;

        let subtotal = order.subtotal()?;
        let ctx = PricingContext::snapshot(order, subtotal);
        let total = resolution.chain.apply(subtotal, &ctx)?;
        if !total.is_positive() {
            return Err(ProcessingError::NonPositiveTotal(total.to_string()));
        }

        order.mark_priced(total)?;
        if entry_status == OrderStatus::Created {
            // First acceptance into the lifecycle; resubmissions skip it.
            self.publish(order, EventKind::Created).await;
        }
        self.publish(order, EventKind::Priced { total }).await;
        tracing::debug!(order_id = %order.id, %total, "order priced");

        let result = match tokio::time::timeout(
            self.authorize_timeout,
            resolution.strategy.authorize(order, total),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => PaymentResult::error("authorization timed out"),
        };

        let event = if result.is_authorized() {
            order.mark_paid()?;
            tracing::debug!(order_id = %order.id, reference = ?result.reference, "payment authorized");
            self.publish(
                order,
                EventKind::PaymentSucceeded {
                    total,
                    reference: result.reference.clone(),
                },
            )
            .await
        } else {
            order.mark_failed()?;
            let reason = result.reason_or_default();
            tracing::warn!(order_id = %order.id, outcome = ?result.outcome, %reason, "payment failed");
            self.publish(order, EventKind::PaymentFailed { reason }).await
        };

        Ok(event)
    }

    /// Caller-initiated cancellation; false when the order is already
    /// terminal (Paid or Cancelled).
    pub async fn cancel_order(&self, order: &mut Order) -> bool {
        if order.mark_cancelled().is_err() {
            return false;
        }
        self.publish(order, EventKind::Cancelled).await;
        tracing::debug!(order_id = %order.id, "order cancelled");
        true
    }

    /// Publishes after the status field is updated, so observers that query
    /// the order see post-transition state.
    async fn publish(&self, order: &Order, kind: EventKind) -> OrderEvent {
        let event = OrderEvent::now(order.id, kind);
        self.bus.publish(&event).await;
        event
    }
}
