use crate::application::factory::{HandlerFactory, HandlerFactoryBuilder};
use crate::domain::money::Money;
use crate::error::{ProcessingError, Result};
use crate::infrastructure::adjustments::{BulkDiscount, ShippingSurcharge, TaxAdjustment};
use crate::infrastructure::gateways::{BankTransferGateway, CardGateway, StoredCreditGateway};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn default_timeout_ms() -> u64 {
    1500
}

/// The registration table: tag -> implementation name plus the
/// implementation's parameters. Loaded once, before the processor accepts
/// submissions, and compiled into an immutable `HandlerFactory`.
#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_timeout_ms")]
    pub authorize_timeout_ms: u64,
    pub methods: Vec<MethodSpec>,
    #[serde(default)]
    pub adjustments: Vec<AdjustmentSpec>,
}

#[derive(Debug, Deserialize)]
pub struct MethodSpec {
    pub tag: String,
    #[serde(flatten)]
    pub gateway: GatewaySpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "impl", rename_all = "snake_case")]
pub enum GatewaySpec {
    CreditCard {
        credit_limit: Money,
        #[serde(default)]
        latency_ms: u64,
    },
    BankTransfer {
        #[serde(default)]
        latency_ms: u64,
        #[serde(default)]
        outage: bool,
    },
    StoredCredit {
        balance: Money,
    },
}

#[derive(Debug, Deserialize)]
pub struct AdjustmentSpec {
    pub tag: String,
    pub priority: u8,
    #[serde(flatten)]
    pub adjustment: AdjustmentKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "impl", rename_all = "snake_case")]
pub enum AdjustmentKind {
    Discount { rate: Decimal, min_quantity: u32 },
    Tax { rate: Decimal },
    Surcharge { fee: Money },
}

impl EngineConfig {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let config: EngineConfig = serde_json::from_reader(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    fn validate(&self) -> Result<()> {
        for spec in &self.adjustments {
            match &spec.adjustment {
                AdjustmentKind::Discount { rate, .. } => {
                    if !(Decimal::ZERO..Decimal::ONE).contains(rate) {
                        return Err(ProcessingError::Config(format!(
                            "discount rate for '{}' must be in [0, 1), got {rate}",
                            spec.tag
                        )));
                    }
                }
                AdjustmentKind::Tax { rate } => {
                    if rate.is_sign_negative() {
                        return Err(ProcessingError::Config(format!(
                            "tax rate for '{}' must not be negative, got {rate}",
                            spec.tag
                        )));
                    }
                }
                AdjustmentKind::Surcharge { .. } => {}
            }
        }
        Ok(())
    }

    pub fn authorize_timeout(&self) -> Duration {
        Duration::from_millis(self.authorize_timeout_ms)
    }

    /// Instantiates every registered gateway and adjustment and freezes the
    /// factory. Fails when the table registers no payment method at all.
    pub fn build_factory(&self) -> Result<HandlerFactory> {
        let mut builder = HandlerFactoryBuilder::new();
        for spec in &self.methods {
            match &spec.gateway {
                GatewaySpec::CreditCard {
                    credit_limit,
                    latency_ms,
                } => builder.register_method(
                    &spec.tag,
                    Arc::new(CardGateway::new(
                        *credit_limit,
                        Duration::from_millis(*latency_ms),
                    )),
                ),
                GatewaySpec::BankTransfer { latency_ms, outage } => builder.register_method(
                    &spec.tag,
                    Arc::new(BankTransferGateway::new(
                        Duration::from_millis(*latency_ms),
                        *outage,
                    )),
                ),
                GatewaySpec::StoredCredit { balance } => builder
                    .register_method(&spec.tag, Arc::new(StoredCreditGateway::new(*balance))),
            }
        }
        for spec in &self.adjustments {
            match &spec.adjustment {
                AdjustmentKind::Discount { rate, min_quantity } => builder.register_adjustment(
                    &spec.tag,
                    Arc::new(BulkDiscount::new(spec.tag.clone(), *rate, *min_quantity)),
                    spec.priority,
                ),
                AdjustmentKind::Tax { rate } => builder.register_adjustment(
                    &spec.tag,
                    Arc::new(TaxAdjustment::new(spec.tag.clone(), *rate)),
                    spec.priority,
                ),
                AdjustmentKind::Surcharge { fee } => builder.register_adjustment(
                    &spec.tag,
                    Arc::new(ShippingSurcharge::new(spec.tag.clone(), *fee)),
                    spec.priority,
                ),
            }
        }
        builder.build()
    }
}
