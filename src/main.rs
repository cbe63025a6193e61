use clap::Parser;
use miette::{IntoDiagnostic, Result};
use orderflow::application::bus::NotificationBus;
use orderflow::application::processor::OrderProcessor;
use orderflow::domain::event::EventKind;
use orderflow::domain::ports::LogSinkRef;
use orderflow::infrastructure::observers::{
    AuditObserver, InventoryObserver, ReceiptObserver, TracingLogSink,
};
use orderflow::interfaces::config::EngineConfig;
use orderflow::interfaces::orders::load_orders;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Strategy/adjustment registration table (JSON)
    config: PathBuf,

    /// Orders to submit (JSON array)
    orders: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = EngineConfig::from_path(&cli.config).into_diagnostic()?;
    let factory = Arc::new(config.build_factory().into_diagnostic()?);
    let bus = Arc::new(NotificationBus::new());
    let processor = OrderProcessor::new(factory, bus.clone())
        .with_authorize_timeout(config.authorize_timeout());

    let mut orders = load_orders(&cli.orders).into_diagnostic()?;

    let sink: LogSinkRef = Arc::new(TracingLogSink);
    let stock: Vec<(String, i64)> = orders
        .iter()
        .flat_map(|order| order.items.iter())
        .map(|item| (item.sku.clone(), 1000))
        .collect();
    let inventory = Arc::new(InventoryObserver::new(stock));
    let receipts = Arc::new(ReceiptObserver::new());

    let _audit = bus.subscribe(Arc::new(AuditObserver::new(sink))).await;
    let _inventory = bus.subscribe(inventory.clone()).await;
    let _receipts = bus.subscribe(receipts.clone()).await;

    for order in &mut orders {
        inventory.track(order);
        match processor.submit_order(order).await {
            Ok(event) => match event.kind {
                EventKind::PaymentSucceeded { total, .. } => {
                    println!("order {} for {}: paid {total}", order.id, order.customer);
                }
                EventKind::PaymentFailed { reason } => {
                    println!("order {} for {}: failed ({reason})", order.id, order.customer);
                }
                other => {
                    println!("order {} for {}: {other:?}", order.id, order.customer);
                }
            },
            Err(e) => {
                eprintln!("order {} rejected: {e}", order.id);
            }
        }
    }

    for receipt in receipts.receipts() {
        println!(
            "receipt {} -> {} ({})",
            receipt.order_id,
            receipt.total,
            receipt.reference.as_deref().unwrap_or("n/a")
        );
    }

    Ok(())
}
