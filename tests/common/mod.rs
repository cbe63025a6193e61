use orderflow::application::bus::NotificationBus;
use orderflow::application::factory::{HandlerFactory, HandlerFactoryBuilder};
use orderflow::application::processor::OrderProcessor;
use orderflow::domain::event::{EventKind, OrderEvent};
use orderflow::domain::money::{Currency, Money};
use orderflow::domain::order::{LineItem, LineItemKind, Order};
use orderflow::domain::ports::{ObserverError, OrderObserver};
use orderflow::infrastructure::adjustments::{BulkDiscount, ShippingSurcharge, TaxAdjustment};
use orderflow::infrastructure::gateways::CardGateway;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn usd(minor: i64) -> Money {
    Money::new(minor, Currency::Usd)
}

pub fn line(sku: &str, quantity: u32, cents: i64) -> LineItem {
    LineItem {
        sku: sku.to_string(),
        quantity,
        unit_price: usd(cents),
        kind: LineItemKind::Physical,
    }
}

pub fn digital_line(sku: &str, quantity: u32, cents: i64) -> LineItem {
    LineItem {
        sku: sku.to_string(),
        quantity,
        unit_price: usd(cents),
        kind: LineItemKind::Digital,
    }
}

/// Credit card (50.00 USD limit) with an 8% tax adjustment only: the
/// canonical pricing scenario.
pub fn tax_only_factory() -> HandlerFactory {
    let mut builder = HandlerFactoryBuilder::new();
    builder.register_method(
        "creditcard",
        Arc::new(CardGateway::new(usd(5000), Duration::ZERO)),
    );
    builder.register_adjustment("vat", Arc::new(TaxAdjustment::new("vat", dec!(0.08))), 20);
    builder.build().expect("factory builds")
}

/// Full chain: 5% bulk discount from 5 items, 8% tax, 5.00 USD shipping
/// surcharge on physical orders.
pub fn full_factory() -> HandlerFactory {
    let mut builder = HandlerFactoryBuilder::new();
    builder.register_method(
        "creditcard",
        Arc::new(CardGateway::new(usd(500000), Duration::ZERO)),
    );
    builder.register_adjustment(
        "bulk",
        Arc::new(BulkDiscount::new("bulk", dec!(0.05), 5)),
        10,
    );
    builder.register_adjustment("vat", Arc::new(TaxAdjustment::new("vat", dec!(0.08))), 20);
    builder.register_adjustment(
        "shipping",
        Arc::new(ShippingSurcharge::new("shipping", usd(500))),
        30,
    );
    builder.build().expect("factory builds")
}

pub fn processor_with(factory: HandlerFactory) -> (Arc<OrderProcessor>, Arc<NotificationBus>) {
    let bus = Arc::new(NotificationBus::new());
    let processor = Arc::new(OrderProcessor::new(Arc::new(factory), bus.clone()));
    (processor, bus)
}

pub fn two_unit_order() -> Order {
    Order::new("alice", "creditcard", vec![line("A", 2, 500)])
}

/// Records every event it sees, for asserting on sequences.
#[derive(Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<OrderEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .map(|event| match &event.kind {
                EventKind::Created => "created",
                EventKind::Priced { .. } => "priced",
                EventKind::PaymentSucceeded { .. } => "paid",
                EventKind::PaymentFailed { .. } => "failed",
                EventKind::Cancelled => "cancelled",
            })
            .collect()
    }
}

impl OrderObserver for CollectingObserver {
    fn name(&self) -> &str {
        "collector"
    }

    fn on_event(&self, event: &OrderEvent) -> Result<(), ObserverError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Always signals an error; used to prove fan-out isolation.
pub struct FailingObserver;

impl OrderObserver for FailingObserver {
    fn name(&self) -> &str {
        "failing"
    }

    fn on_event(&self, _event: &OrderEvent) -> Result<(), ObserverError> {
        Err(ObserverError("observer exploded".to_string()))
    }
}
