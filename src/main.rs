use clap::Parser;
use invoice_app::application::processor::InvoicePaymentProcessor;
use invoice_app::application::retry::RetryPolicy;
use invoice_app::config::{Cli, Command, ProviderSettings};
use invoice_app::domain::invoice::Invoice;
use invoice_app::domain::ports::{InvoiceStoreRef, PaymentProviderRef};
use invoice_app::error::AppError;
use invoice_app::infrastructure::http_provider::{DEFAULT_CONNECT_TIMEOUT, HttpPaymentProvider};
use invoice_app::infrastructure::in_memory::InMemoryInvoiceStore;
use invoice_app::infrastructure::mock::MockPaymentProvider;
#[cfg(feature = "storage-rocksdb")]
use invoice_app::infrastructure::rocksdb::RocksDBInvoiceStore;
use invoice_app::interfaces::csv::invoice_reader::InvoiceReader;
use invoice_app::interfaces::http::{AppState, build_router};
use invoice_app::telemetry;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json);

    let store = open_store(&cli).await?;
    let provider = build_provider(&cli.provider)?;
    let processor =
        InvoicePaymentProcessor::new(store.clone(), provider, RetryPolicy::from(&cli.retry));

    match cli.command() {
        Command::Serve => serve(cli.listen, store, processor).await,
        Command::Pay => pay(&processor).await,
        Command::List => list(&store).await,
    }
}

async fn open_store(cli: &Cli) -> Result<InvoiceStoreRef> {
    let seed = match &cli.seed {
        Some(path) => load_seed(path)?,
        None => Vec::new(),
    };

    if let Some(db_path) = &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store = RocksDBInvoiceStore::open(db_path).into_diagnostic()?;
            for invoice in seed {
                log_insert(store.insert(invoice).await)?;
            }
            return Ok(Arc::new(store));
        }

        #[cfg(not(feature = "storage-rocksdb"))]
        tracing::warn!(
            db_path = %db_path.display(),
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    let store = InMemoryInvoiceStore::new();
    for invoice in seed {
        log_insert(store.insert(invoice).await)?;
    }
    Ok(Arc::new(store))
}

/// Reads seed invoices, skipping rows that fail to parse or validate.
fn load_seed(path: &Path) -> Result<Vec<Invoice>> {
    let file = File::open(path).into_diagnostic()?;
    let mut invoices = Vec::new();
    for result in InvoiceReader::new(file).invoices() {
        match result {
            Ok(invoice) => invoices.push(invoice),
            Err(e) => tracing::warn!(error = %e, "Error reading invoice"),
        }
    }
    tracing::info!(count = invoices.len(), path = %path.display(), "loaded seed invoices");
    Ok(invoices)
}

/// Duplicates are expected when re-seeding a persistent store.
fn log_insert(result: invoice_app::error::Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(AppError::DuplicateInvoice(id)) => {
            tracing::debug!(invoice_id = %id, "seed invoice already present");
            Ok(())
        }
        Err(e) => Err(e).into_diagnostic(),
    }
}

fn build_provider(settings: &ProviderSettings) -> Result<PaymentProviderRef> {
    if settings.mock {
        tracing::info!(rejecting = ?settings.mock_reject, "using mock payment provider");
        return Ok(Arc::new(MockPaymentProvider::rejecting(
            settings.mock_reject.iter().cloned(),
        )));
    }

    let provider =
        HttpPaymentProvider::with_timeouts(&settings.url, settings.timeout(), DEFAULT_CONNECT_TIMEOUT)
            .into_diagnostic()?;
    tracing::info!(url = %provider.url(), timeout = ?settings.timeout(), "using HTTP payment provider");
    Ok(Arc::new(provider))
}

async fn serve(
    addr: SocketAddr,
    store: InvoiceStoreRef,
    processor: InvoicePaymentProcessor,
) -> Result<()> {
    let app = build_router(AppState::new(store, processor));
    let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
    tracing::info!(addr = %listener.local_addr().into_diagnostic()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .into_diagnostic()
}

async fn pay(processor: &InvoicePaymentProcessor) -> Result<()> {
    let report = processor.run_payment_batch().await.into_diagnostic()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report.summary()).into_diagnostic()?
    );

    if !report.is_success() {
        miette::bail!(
            "payment batch left {} invoice(s) unsettled",
            report.unsettled_count()
        );
    }
    Ok(())
}

async fn list(store: &InvoiceStoreRef) -> Result<()> {
    let invoices = store.list_all().await.into_diagnostic()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&invoices).into_diagnostic()?
    );
    Ok(())
}
