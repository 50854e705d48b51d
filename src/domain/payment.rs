use super::invoice::Invoice;
use super::money::{Currency, Money};
use serde::Serialize;
use thiserror::Error;

/// The body sent to the payment provider for a single invoice.
///
/// Only lives for the duration of one remote call; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub id: String,
    pub value: Money,
    pub currency: Currency,
}

impl From<&Invoice> for PaymentRequest {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.invoice_id.clone(),
            value: invoice.value,
            currency: invoice.currency.clone(),
        }
    }
}

/// Why the provider did not accept a payment.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
    /// No connection could be established, so nothing reached the provider.
    #[error("provider unreachable: {0}")]
    Unreachable(String),
    #[error("provider call timed out")]
    Timeout,
    #[error("provider responded with status {0}")]
    Status(u16),
    #[error("provider call failed: {0}")]
    Transport(String),
}

impl RejectReason {
    /// Whether resubmitting cannot result in a second charge.
    ///
    /// A timeout or an error status may arrive after the provider already
    /// moved the money, so only a refused connection qualifies.
    pub fn is_retry_safe(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl PaymentOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}
