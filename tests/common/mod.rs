#![allow(dead_code)]

use async_trait::async_trait;
use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use invoice_app::domain::invoice::Invoice;
use invoice_app::domain::money::{Currency, Money};
use invoice_app::domain::ports::InvoiceStore;
use invoice_app::error::{AppError, Result};
use invoice_app::infrastructure::in_memory::InMemoryInvoiceStore;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn invoice(id: &str, value: Decimal, paid: bool) -> Invoice {
    Invoice::new(id, Money::new(value).unwrap(), Currency::new("USD").unwrap())
        .unwrap()
        .with_paid(paid)
}

/// A(unpaid, 10 USD), B(unpaid, 20 USD), C(paid, 5 USD).
pub fn scenario_store() -> InMemoryInvoiceStore {
    InMemoryInvoiceStore::with_invoices(vec![
        invoice("A", Decimal::from(10), false),
        invoice("B", Decimal::from(20), false),
        invoice("C", Decimal::from(5), true),
    ])
    .unwrap()
}

pub async fn paid_ids(store: &dyn InvoiceStore) -> Vec<String> {
    store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|i| i.paid)
        .map(|i| i.invoice_id)
        .collect()
}

/// A store whose backend cannot be reached.
pub struct UnavailableStore;

#[async_trait]
impl InvoiceStore for UnavailableStore {
    async fn list_all(&self) -> Result<Vec<Invoice>> {
        Err(AppError::store_unavailable("connection refused"))
    }

    async fn list_unpaid(&self) -> Result<Vec<Invoice>> {
        Err(AppError::store_unavailable("connection refused"))
    }

    async fn mark_paid(&self, _invoice_id: &str) -> Result<()> {
        Err(AppError::store_unavailable("connection refused"))
    }
}

/// Wraps an in-memory store and fails `mark_paid` for selected invoices.
pub struct FailingMarkStore {
    pub inner: InMemoryInvoiceStore,
    pub fail_on: HashSet<String>,
    pub mark_calls: AtomicUsize,
}

impl FailingMarkStore {
    pub fn new(inner: InMemoryInvoiceStore, fail_on: &[&str]) -> Self {
        Self {
            inner,
            fail_on: fail_on.iter().map(|id| id.to_string()).collect(),
            mark_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl InvoiceStore for FailingMarkStore {
    async fn list_all(&self) -> Result<Vec<Invoice>> {
        self.inner.list_all().await
    }

    async fn list_unpaid(&self) -> Result<Vec<Invoice>> {
        self.inner.list_unpaid().await
    }

    async fn mark_paid(&self, invoice_id: &str) -> Result<()> {
        self.mark_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(invoice_id) {
            return Err(AppError::store_unavailable("write failed"));
        }
        self.inner.mark_paid(invoice_id).await
    }
}

#[derive(Clone)]
struct StubState {
    reject: Arc<HashSet<String>>,
    delay: Duration,
    received: Arc<Mutex<Vec<Value>>>,
}

/// A local HTTP payment provider answering `500` for rejected ids.
pub struct ProviderStub {
    pub url: String,
    received: Arc<Mutex<Vec<Value>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl ProviderStub {
    pub async fn spawn(reject: &[&str]) -> Self {
        Self::spawn_with_delay(reject, Duration::ZERO).await
    }

    pub async fn spawn_with_delay(reject: &[&str], delay: Duration) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reject: Arc::new(reject.iter().map(|id| id.to_string()).collect()),
            delay,
            received: received.clone(),
        };
        let app = Router::new()
            .route("/payments/pay", post(pay))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/payments/pay", addr),
            received,
            handle,
        }
    }

    /// Request bodies received so far.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for ProviderStub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn pay(State(state): State<StubState>, Json(body): Json<Value>) -> StatusCode {
    state.received.lock().unwrap().push(body.clone());
    tokio::time::sleep(state.delay).await;

    let id = body["id"].as_str().unwrap_or_default();
    if state.reject.contains(id) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

/// A URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/payments/pay", addr)
}
