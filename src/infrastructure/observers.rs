//! Example observers: audit logging, inventory adjustment, receipt
//! issuance. Each reacts to lifecycle events independently; none knows the
//! others exist.

use crate::domain::event::{EventKind, OrderEvent};
use crate::domain::money::Money;
use crate::domain::order::{Order, OrderId};
use crate::domain::ports::{LogLevel, LogSink, LogSinkRef, ObserverError, OrderObserver};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Bridges the `LogSink` collaborator contract onto `tracing`.
#[derive(Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}

/// In-memory sink for asserting on log output in tests.
#[derive(Default)]
pub struct MemoryLogSink {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

/// Writes one line per lifecycle event to a `LogSink`.
pub struct AuditObserver {
    sink: LogSinkRef,
}

impl AuditObserver {
    pub fn new(sink: LogSinkRef) -> Self {
        Self { sink }
    }
}

impl OrderObserver for AuditObserver {
    fn name(&self) -> &str {
        "audit"
    }

    fn on_event(&self, event: &OrderEvent) -> Result<(), ObserverError> {
        let (level, line) = match &event.kind {
            EventKind::Created => (LogLevel::Info, format!("order {} accepted", event.order_id)),
            EventKind::Priced { total } => (
                LogLevel::Info,
                format!("order {} priced at {total}", event.order_id),
            ),
            EventKind::PaymentSucceeded { total, reference } => (
                LogLevel::Info,
                format!(
                    "order {} paid {total} (ref {})",
                    event.order_id,
                    reference.as_deref().unwrap_or("n/a")
                ),
            ),
            EventKind::PaymentFailed { reason } => (
                LogLevel::Warn,
                format!("order {} payment failed: {reason}", event.order_id),
            ),
            EventKind::Cancelled => (
                LogLevel::Info,
                format!("order {} cancelled", event.order_id),
            ),
        };
        self.sink.log(level, &line);
        Ok(())
    }
}

/// Commits stock on `PaymentSucceeded` and releases the reservation on
/// cancellation. Failed orders keep theirs: they may be resubmitted.
///
/// Events carry the order id only, so the observer keeps its own record of
/// what each order reserves; the driver registers an order's items before
/// submitting it.
pub struct InventoryObserver {
    stock: Mutex<HashMap<String, i64>>,
    reservations: Mutex<HashMap<OrderId, Vec<(String, u32)>>>,
}

impl InventoryObserver {
    pub fn new(stock: impl IntoIterator<Item = (String, i64)>) -> Self {
        Self {
            stock: Mutex::new(stock.into_iter().collect()),
            reservations: Mutex::new(HashMap::new()),
        }
    }

    pub fn track(&self, order: &Order) {
        let items = order
            .items
            .iter()
            .map(|item| (item.sku.clone(), item.quantity))
            .collect();
        self.reservations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order.id, items);
    }

    pub fn stock_of(&self, sku: &str) -> Option<i64> {
        self.stock.lock().unwrap_or_else(PoisonError::into_inner).get(sku).copied()
    }
}

impl OrderObserver for InventoryObserver {
    fn name(&self) -> &str {
        "inventory"
    }

    fn on_event(&self, event: &OrderEvent) -> Result<(), ObserverError> {
        match &event.kind {
            EventKind::PaymentSucceeded { .. } => {
                let reservations = self
                    .reservations
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&event.order_id)
                    .ok_or_else(|| {
                        ObserverError(format!("no reservation for order {}", event.order_id))
                    })?;
                let mut stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
                for (sku, quantity) in reservations {
                    let entry = stock
                        .get_mut(&sku)
                        .ok_or_else(|| ObserverError(format!("unknown sku {sku}")))?;
                    *entry -= i64::from(quantity);
                }
                Ok(())
            }
            EventKind::Cancelled => {
                self.reservations
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&event.order_id);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub order_id: OrderId,
    pub total: Money,
    pub reference: Option<String>,
    pub issued_at: DateTime<Utc>,
}

/// Issues one receipt per successful payment.
#[derive(Default)]
pub struct ReceiptObserver {
    receipts: Mutex<Vec<Receipt>>,
}

impl ReceiptObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receipts(&self) -> Vec<Receipt> {
        self.receipts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl OrderObserver for ReceiptObserver {
    fn name(&self) -> &str {
        "receipts"
    }

    fn on_event(&self, event: &OrderEvent) -> Result<(), ObserverError> {
        if let EventKind::PaymentSucceeded { total, reference } = &event.kind {
            self.receipts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Receipt {
                    order_id: event.order_id,
                    total: *total,
                    reference: reference.clone(),
                    issued_at: event.at,
                });
        }
        Ok(())
    }
}
