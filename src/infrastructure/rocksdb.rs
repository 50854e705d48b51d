use crate::domain::invoice::Invoice;
use crate::domain::ports::InvoiceStore;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing invoices.
pub const CF_INVOICES: &str = "invoices";

/// A persistent invoice store backed by RocksDB.
///
/// Invoices live in their own column family keyed by invoice id, with the
/// invoice JSON as value. Snapshots come back in key order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBInvoiceStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

fn decode(bytes: &[u8]) -> Result<Invoice> {
    serde_json::from_slice(bytes).map_err(|e| {
        AppError::store_unavailable(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to deserialize invoice: {}", e),
        ))
    })
}

fn encode(invoice: &Invoice) -> Result<Vec<u8>> {
    serde_json::to_vec(invoice).map_err(|e| {
        AppError::store_unavailable(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        ))
    })
}

impl RocksDBInvoiceStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_invoices = ColumnFamilyDescriptor::new(CF_INVOICES, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_invoices])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_INVOICES).ok_or_else(|| {
            AppError::store_unavailable(std::io::Error::other(
                "Invoices column family not found",
            ))
        })
    }

    pub async fn insert(&self, invoice: Invoice) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf = self.cf()?;
        let key = invoice.invoice_id.as_bytes();

        if self.db.get_pinned_cf(cf, key)?.is_some() {
            return Err(AppError::DuplicateInvoice(invoice.invoice_id));
        }
        self.db.put_cf(cf, key, encode(&invoice)?)?;
        Ok(())
    }

    fn scan(&self, keep: impl Fn(&Invoice) -> bool) -> Result<Vec<Invoice>> {
        let cf = self.cf()?;
        let mut invoices = Vec::new();

        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let invoice = decode(&value)?;
            if keep(&invoice) {
                invoices.push(invoice);
            }
        }

        Ok(invoices)
    }
}

#[async_trait]
impl InvoiceStore for RocksDBInvoiceStore {
    async fn list_all(&self) -> Result<Vec<Invoice>> {
        self.scan(|_| true)
    }

    async fn list_unpaid(&self) -> Result<Vec<Invoice>> {
        self.scan(Invoice::is_unpaid)
    }

    async fn mark_paid(&self, invoice_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf = self.cf()?;
        let key = invoice_id.as_bytes();

        let bytes = self
            .db
            .get_cf(cf, key)?
            .ok_or_else(|| AppError::InvoiceNotFound(invoice_id.to_string()))?;
        let mut invoice = decode(&bytes)?;
        if invoice.paid {
            return Ok(());
        }

        invoice.mark_paid();
        self.db.put_cf(cf, key, encode(&invoice)?)?;
        Ok(())
    }
}
