use crate::domain::event::OrderEvent;
use crate::domain::money::Money;
use crate::domain::order::Order;
use crate::domain::payment::PaymentResult;
use crate::domain::pricing::PricingContext;
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// An interchangeable payment-authorization algorithm.
///
/// Strategies are stateless with respect to any particular order; whatever
/// internal state one keeps (a balance, a rate limiter) must be safe for
/// concurrent use, since distinct orders authorize concurrently. The
/// processor guarantees `amount` is positive and the order is `Priced`
/// before calling.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    async fn authorize(&self, order: &Order, amount: Money) -> PaymentResult;
}

/// Strategies are registered once and shared across concurrent submissions.
pub type StrategyRef = Arc<dyn PaymentStrategy>;

/// A composable transformation of a running order total.
///
/// `apply` must return a fresh `Money` and leave `base` untouched; a chain
/// of adjustments folds left, so wrapping `d2` around `d1` computes
/// `d2.apply(d1.apply(base))`. Whether an adjustment participates at all is
/// decided once, at factory resolution time, via `applies`.
pub trait FeeAdjustment: Send + Sync {
    fn label(&self) -> &str;

    /// Resolution-time predicate; the default includes the adjustment for
    /// every order.
    fn applies(&self, _order: &Order) -> bool {
        true
    }

    fn apply(&self, base: Money, ctx: &PricingContext) -> Result<Money>;
}

pub type AdjustmentRef = Arc<dyn FeeAdjustment>;

/// Failure signalled by a single observer; recorded by the bus, never
/// propagated to the publisher or to other observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverError(pub String);

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ObserverError {}

/// A registered listener for order lifecycle events.
pub trait OrderObserver: Send + Sync {
    fn name(&self) -> &str;

    fn on_event(&self, event: &OrderEvent) -> std::result::Result<(), ObserverError>;
}

pub type ObserverRef = Arc<dyn OrderObserver>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Logging sink consumed by example observers. Collaborator contract only;
/// the crate's own instrumentation goes through `tracing` directly.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub type LogSinkRef = Arc<dyn LogSink>;
