use crate::domain::money::Currency;
use crate::domain::order::OrderStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Errors surfaced by the order-processing pipeline.
///
/// Payment declines and gateway faults are *not* errors: they are
/// `PaymentResult` values, since a failed authorization is a normal
/// outcome the state machine absorbs by transitioning the order to
/// `Failed`. Observer failures are likewise isolated inside the
/// notification bus and never reach this type.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("invalid order: {0}")]
    InvalidOrder(String),
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },
    #[error("amount out of range")]
    AmountOverflow,
    #[error("unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),
    #[error("illegal status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("priced total must be positive, got {0}")]
    NonPositiveTotal(String),
    #[error("no payment methods registered")]
    NoPaymentMethods,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
