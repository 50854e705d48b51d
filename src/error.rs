use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invoice store unavailable: {0}")]
    StoreUnavailable(#[source] BoxError),
    #[error("Invoice {0} not found")]
    InvoiceNotFound(String),
    #[error("Duplicate invoice id {0}")]
    DuplicateInvoice(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// The provider confirmed the payment but the store did not record it.
    #[error("Invoice {invoice_id} was paid but could not be marked paid: {source}")]
    InconsistentState {
        invoice_id: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    pub fn store_unavailable(err: impl Into<BoxError>) -> Self {
        Self::StoreUnavailable(err.into())
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for AppError {
    fn from(err: rocksdb::Error) -> Self {
        Self::store_unavailable(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
