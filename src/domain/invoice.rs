use super::money::{Currency, Money};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// A billable record with an amount, a currency and a paid flag.
///
/// Everything but `paid` is fixed once the invoice exists. `paid` only ever
/// moves from `false` to `true`, and only after the provider confirmed the
/// payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_id: String,
    pub value: Money,
    pub currency: Currency,
    #[serde(default)]
    pub paid: bool,
}

impl Invoice {
    /// Creates a new unpaid invoice.
    pub fn new(
        invoice_id: impl Into<String>,
        value: Money,
        currency: Currency,
    ) -> Result<Self, AppError> {
        let invoice_id = invoice_id.into();
        if invoice_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Invoice id must not be empty".to_string(),
            ));
        }
        Ok(Self {
            invoice_id,
            value,
            currency,
            paid: false,
        })
    }

    pub fn with_paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    pub fn is_unpaid(&self) -> bool {
        !self.paid
    }

    pub fn mark_paid(&mut self) {
        self.paid = true;
    }
}
