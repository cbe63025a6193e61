use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Authorized,
    /// The gateway understood the request and said no (insufficient funds,
    /// over limit). Retryable by resubmission.
    Declined,
    /// The gateway could not give an answer (outage, timeout). Also
    /// retryable; distinct from Declined for reporting.
    Error,
}

/// Outcome of one authorization attempt. Immutable once constructed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentResult {
    pub outcome: PaymentOutcome,
    pub reference: Option<String>,
    pub reason: Option<String>,
}

impl PaymentResult {
    pub fn authorized(reference: impl Into<String>) -> Self {
        Self {
            outcome: PaymentOutcome::Authorized,
            reference: Some(reference.into()),
            reason: None,
        }
    }

    pub fn declined(reason: impl Into<String>) -> Self {
        Self {
            outcome: PaymentOutcome::Declined,
            reference: None,
            reason: Some(reason.into()),
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            outcome: PaymentOutcome::Error,
            reference: None,
            reason: Some(reason.into()),
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.outcome == PaymentOutcome::Authorized
    }

    /// Reason text for the `PaymentFailed` event payload.
    pub fn reason_or_default(&self) -> String {
        self.reason
            .clone()
            .unwrap_or_else(|| "payment not authorized".to_string())
    }
}
