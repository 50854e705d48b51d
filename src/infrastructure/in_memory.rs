use crate::domain::invoice::Invoice;
use crate::domain::ports::InvoiceStore;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory invoice store.
///
/// Uses `Arc<RwLock<Vec<Invoice>>>` so clones share the same invoices.
/// Snapshots come back in insertion order.
#[derive(Default, Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<Vec<Invoice>>>,
}

impl InMemoryInvoiceStore {
    /// Creates a new, empty in-memory invoice store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `invoices`, rejecting duplicate ids.
    pub fn with_invoices(invoices: impl IntoIterator<Item = Invoice>) -> Result<Self> {
        let mut seeded: Vec<Invoice> = Vec::new();
        for invoice in invoices {
            if seeded.iter().any(|i| i.invoice_id == invoice.invoice_id) {
                return Err(AppError::DuplicateInvoice(invoice.invoice_id));
            }
            seeded.push(invoice);
        }
        Ok(Self {
            invoices: Arc::new(RwLock::new(seeded)),
        })
    }

    pub async fn insert(&self, invoice: Invoice) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        if invoices.iter().any(|i| i.invoice_id == invoice.invoice_id) {
            return Err(AppError::DuplicateInvoice(invoice.invoice_id));
        }
        invoices.push(invoice);
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn list_all(&self) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.clone())
    }

    async fn list_unpaid(&self) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.iter().filter(|i| i.is_unpaid()).cloned().collect())
    }

    async fn mark_paid(&self, invoice_id: &str) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        let invoice = invoices
            .iter_mut()
            .find(|i| i.invoice_id == invoice_id)
            .ok_or_else(|| AppError::InvoiceNotFound(invoice_id.to_string()))?;
        invoice.mark_paid();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::{Currency, Money};
    use rust_decimal_macros::dec;

    fn invoice(id: &str, paid: bool) -> Invoice {
        Invoice::new(
            id,
            Money::new(dec!(10.0)).unwrap(),
            Currency::new("USD").unwrap(),
        )
        .unwrap()
        .with_paid(paid)
    }

    #[tokio::test]
    async fn test_list_unpaid_filters_paid_invoices() {
        let store = InMemoryInvoiceStore::with_invoices(vec![
            invoice("A", false),
            invoice("B", true),
            invoice("C", false),
        ])
        .unwrap();

        let unpaid: Vec<String> = store
            .list_unpaid()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.invoice_id)
            .collect();
        assert_eq!(unpaid, vec!["A", "C"]);
        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_mark_paid_twice_is_a_no_op() {
        let store = InMemoryInvoiceStore::new();
        store.insert(invoice("A", false)).await.unwrap();

        store.mark_paid("A").await.unwrap();
        store.mark_paid("A").await.unwrap();

        let all = store.list_all().await.unwrap();
        assert!(all[0].paid);
        assert!(store.list_unpaid().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_paid_unknown_invoice() {
        let store = InMemoryInvoiceStore::new();
        assert!(matches!(
            store.mark_paid("missing").await,
            Err(AppError::InvoiceNotFound(id)) if id == "missing"
        ));
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected() {
        let store = InMemoryInvoiceStore::new();
        store.insert(invoice("A", false)).await.unwrap();
        assert!(matches!(
            store.insert(invoice("A", true)).await,
            Err(AppError::DuplicateInvoice(_))
        ));

        assert!(
            InMemoryInvoiceStore::with_invoices(vec![invoice("X", false), invoice("X", false)])
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_snapshot_is_not_live() {
        let store = InMemoryInvoiceStore::with_invoices(vec![invoice("A", false)]).unwrap();
        let snapshot = store.list_unpaid().await.unwrap();
        store.mark_paid("A").await.unwrap();
        assert!(!snapshot[0].paid);
    }
}
