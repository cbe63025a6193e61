use crate::error::{ProcessingError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO-style currency tag for `Money`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary value in integer minor units (cents).
///
/// Keeping amounts in minor units sidesteps float drift entirely; the only
/// fractional arithmetic in the crate is rate application, which goes
/// through `Decimal` and rounds back explicitly. Arithmetic between two
/// values of different currencies fails with `CurrencyMismatch` rather than
/// coercing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    pub fn new(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn minor_units(&self) -> i64 {
        self.minor
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_positive(&self) -> bool {
        self.minor > 0
    }

    fn check_currency(&self, other: &Money) -> Result<()> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(ProcessingError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }

    pub fn try_add(self, other: Money) -> Result<Money> {
        self.check_currency(&other)?;
        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or(ProcessingError::AmountOverflow)?;
        Ok(Money::new(minor, self.currency))
    }

    pub fn try_sub(self, other: Money) -> Result<Money> {
        self.check_currency(&other)?;
        let minor = self
            .minor
            .checked_sub(other.minor)
            .ok_or(ProcessingError::AmountOverflow)?;
        Ok(Money::new(minor, self.currency))
    }

    /// Multiplies by a line-item quantity.
    pub fn times(self, quantity: u32) -> Result<Money> {
        let minor = self
            .minor
            .checked_mul(i64::from(quantity))
            .ok_or(ProcessingError::AmountOverflow)?;
        Ok(Money::new(minor, self.currency))
    }

    /// Scales by a fractional rate, e.g. `1.08` for 8% tax on top.
    ///
    /// Rounds half away from zero on the minor unit, so 8% of 1000¢ is
    /// exactly 1080¢ and odd halves round the way invoices expect.
    pub fn apply_rate(self, rate: Decimal) -> Result<Money> {
        let scaled = Decimal::from(self.minor) * rate;
        let minor = scaled
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(ProcessingError::AmountOverflow)?;
        Ok(Money::new(minor, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        write!(f, "{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}
