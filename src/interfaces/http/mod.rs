//! HTTP API over the invoice store and the payment processor.

pub mod errors;
pub mod routes;

use crate::application::processor::InvoicePaymentProcessor;
use crate::domain::ports::InvoiceStoreRef;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: InvoiceStoreRef,
    pub processor: Arc<InvoicePaymentProcessor>,
    batch_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: InvoiceStoreRef, processor: InvoicePaymentProcessor) -> Self {
        Self {
            store,
            processor: Arc::new(processor),
            batch_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/invoices", get(routes::list_invoices))
        .route("/invoices/pay", post(routes::pay_invoices))
        .with_state(state)
}
