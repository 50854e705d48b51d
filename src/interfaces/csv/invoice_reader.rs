use crate::domain::invoice::Invoice;
use crate::domain::money::{Currency, Money};
use crate::error::{AppError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    invoice_id: String,
    value: Decimal,
    currency: String,
    paid: Option<bool>,
}

impl TryFrom<InvoiceRecord> for Invoice {
    type Error = AppError;

    fn try_from(record: InvoiceRecord) -> Result<Self> {
        let invoice = Invoice::new(
            record.invoice_id,
            Money::new(record.value)?,
            Currency::new(&record.currency)?,
        )?;
        Ok(invoice.with_paid(record.paid.unwrap_or(false)))
    }
}

/// Reads seed invoices from a CSV source.
///
/// Expects the header `invoice_id, value, currency, paid`; the `paid` column
/// may be left empty or omitted entirely.
pub struct InvoiceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvoiceReader<R> {
    /// Creates a new `InvoiceReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates invoices.
    pub fn invoices(self) -> impl Iterator<Item = Result<Invoice>> {
        self.reader.into_deserialize().map(|result| {
            let record: InvoiceRecord = result?;
            Invoice::try_from(record)
        })
    }
}
