//! Simulated payment gateways.
//!
//! The capstone has no network surface, so each gateway simulates its
//! backend: a configurable latency stands in for gateway round-trips and
//! deterministic rules stand in for issuer behavior. All three are safe
//! for concurrent use; `StoredCreditGateway` is the one with real internal
//! state.

use crate::domain::money::Money;
use crate::domain::order::Order;
use crate::domain::payment::PaymentResult;
use crate::domain::ports::PaymentStrategy;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Card authorization with a per-transaction credit limit.
pub struct CardGateway {
    credit_limit: Money,
    latency: Duration,
}

impl CardGateway {
    pub fn new(credit_limit: Money, latency: Duration) -> Self {
        Self {
            credit_limit,
            latency,
        }
    }
}

#[async_trait]
impl PaymentStrategy for CardGateway {
    async fn authorize(&self, _order: &Order, amount: Money) -> PaymentResult {
        tokio::time::sleep(self.latency).await;
        if amount.currency() != self.credit_limit.currency() {
            return PaymentResult::error(format!(
                "card network does not settle {}",
                amount.currency()
            ));
        }
        if amount.minor_units() > self.credit_limit.minor_units() {
            return PaymentResult::declined("insufficient funds");
        }
        PaymentResult::authorized(format!("card-{}", Uuid::new_v4().simple()))
    }
}

/// Bank transfer: slow, and the whole backend can be down at once.
pub struct BankTransferGateway {
    latency: Duration,
    outage: bool,
}

impl BankTransferGateway {
    pub fn new(latency: Duration, outage: bool) -> Self {
        Self { latency, outage }
    }
}

#[async_trait]
impl PaymentStrategy for BankTransferGateway {
    async fn authorize(&self, _order: &Order, _amount: Money) -> PaymentResult {
        tokio::time::sleep(self.latency).await;
        if self.outage {
            return PaymentResult::error("transfer backend unavailable");
        }
        PaymentResult::authorized(format!("bt-{}", Uuid::new_v4().simple()))
    }
}

/// Prepaid store credit drawn down by each authorization.
///
/// The balance check and the deduction happen under one lock, so
/// concurrent authorizations can never overdraw the balance.
pub struct StoredCreditGateway {
    balance: Mutex<Money>,
}

impl StoredCreditGateway {
    pub fn new(balance: Money) -> Self {
        Self {
            balance: Mutex::new(balance),
        }
    }

    pub async fn remaining(&self) -> Money {
        *self.balance.lock().await
    }
}

#[async_trait]
impl PaymentStrategy for StoredCreditGateway {
    async fn authorize(&self, _order: &Order, amount: Money) -> PaymentResult {
        let mut balance = self.balance.lock().await;
        if balance.currency() != amount.currency() {
            return PaymentResult::error(format!(
                "stored credit is held in {}",
                balance.currency()
            ));
        }
        match balance.try_sub(amount) {
            Ok(remaining) if !remaining.minor_units().is_negative() => {
                *balance = remaining;
                PaymentResult::authorized(format!("credit-{}", Uuid::new_v4().simple()))
            }
            _ => PaymentResult::declined("insufficient stored credit"),
        }
    }
}
