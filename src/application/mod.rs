//! Application layer containing the payment orchestration.
//!
//! [`processor::InvoicePaymentProcessor`] drives a batch: it reads the unpaid
//! snapshot, submits each invoice to the provider and records accepted
//! payments back in the store.

pub mod processor;
pub mod report;
pub mod retry;
