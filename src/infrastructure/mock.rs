use crate::domain::payment::{PaymentOutcome, PaymentRequest, RejectReason};
use crate::domain::ports::PaymentProvider;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// In-process payment provider for local runs and tests.
///
/// Accepts every request except those for invoice ids it was told to reject,
/// which get a `402`. Every submitted request is recorded.
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    rejected: HashSet<String>,
    submitted: Arc<Mutex<Vec<PaymentRequest>>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting<I, S>(invoice_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rejected: invoice_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Requests received so far, in submission order.
    pub fn submitted(&self) -> Vec<PaymentRequest> {
        self.submitted
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn submit(&self, request: &PaymentRequest) -> PaymentOutcome {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(request.clone());
        }

        if self.rejected.contains(&request.id) {
            PaymentOutcome::Rejected(RejectReason::Status(402))
        } else {
            PaymentOutcome::Accepted
        }
    }
}
