pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::bus::{DeliveryReport, NotificationBus, SubscriptionHandle};
pub use application::factory::{AdjustmentChain, HandlerFactory, HandlerFactoryBuilder, Resolution};
pub use application::processor::OrderProcessor;
pub use domain::event::{EventKind, OrderEvent};
pub use domain::money::{Currency, Money};
pub use domain::order::{LineItem, LineItemKind, Order, OrderId, OrderStatus};
pub use domain::payment::{PaymentOutcome, PaymentResult};
pub use error::{ProcessingError, Result};
