use super::invoice::Invoice;
use super::payment::{PaymentOutcome, PaymentRequest};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Persistence for invoices as seen by the payment path.
///
/// Implementations own their connection and any locking. Reads return
/// snapshots, not live views.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Invoice>>;
    async fn list_unpaid(&self) -> Result<Vec<Invoice>>;
    /// Marking an invoice that is already paid is a no-op.
    async fn mark_paid(&self, invoice_id: &str) -> Result<()>;
}

/// A remote service that executes payments.
///
/// Every failure, transport included, is reported as a rejected outcome.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn submit(&self, request: &PaymentRequest) -> PaymentOutcome;
}

pub type InvoiceStoreRef = Arc<dyn InvoiceStore>;
pub type PaymentProviderRef = Arc<dyn PaymentProvider>;
