use super::report::{BatchReport, FailedPayment, UnrecordedPayment};
use super::retry::RetryPolicy;
use crate::domain::invoice::Invoice;
use crate::domain::payment::{PaymentOutcome, PaymentRequest};
use crate::domain::ports::{InvoiceStoreRef, PaymentProviderRef};
use crate::error::{AppError, Result};

/// Pays every currently unpaid invoice through the payment provider.
///
/// `InvoicePaymentProcessor` holds no state between batches. Each call to
/// [`run_payment_batch`](Self::run_payment_batch) takes a fresh unpaid
/// snapshot from the store and walks it sequentially, so an invoice that was
/// paid by an earlier batch is never submitted again.
///
/// A rejected invoice does not stop the batch: it is reported and the next
/// invoice is attempted. The batch only halts early when the store fails to
/// record a payment the provider already accepted.
pub struct InvoicePaymentProcessor {
    store: InvoiceStoreRef,
    provider: PaymentProviderRef,
    retry: RetryPolicy,
}

impl InvoicePaymentProcessor {
    /// Creates a new `InvoicePaymentProcessor`.
    ///
    /// # Arguments
    ///
    /// * `store` - The invoice store to read from and record payments in.
    /// * `provider` - The remote payment provider.
    /// * `retry` - Retry policy applied to each submission.
    pub fn new(store: InvoiceStoreRef, provider: PaymentProviderRef, retry: RetryPolicy) -> Self {
        Self {
            store,
            provider,
            retry,
        }
    }

    /// Runs one payment batch over the current unpaid snapshot.
    ///
    /// Fails only when the unpaid invoices cannot be read, in which case no
    /// provider call has been made. Everything else ends up in the report.
    #[tracing::instrument(skip(self))]
    pub async fn run_payment_batch(&self) -> Result<BatchReport> {
        let unpaid = self.store.list_unpaid().await?;
        tracing::info!(invoices = unpaid.len(), "starting payment batch");

        let mut report = BatchReport::default();
        let mut pending = unpaid.into_iter();

        while let Some(invoice) = pending.next() {
            let (outcome, attempts) = self.submit(&invoice).await;

            match outcome {
                PaymentOutcome::Accepted => {
                    if let Err(err) = self.store.mark_paid(&invoice.invoice_id).await {
                        let err = AppError::InconsistentState {
                            invoice_id: invoice.invoice_id.clone(),
                            source: Box::new(err),
                        };
                        tracing::error!(
                            invoice_id = %invoice.invoice_id,
                            error = %err,
                            "payment accepted by provider but not recorded; halting batch"
                        );
                        report.unrecorded.push(UnrecordedPayment {
                            invoice_id: invoice.invoice_id,
                            error: err.to_string(),
                        });
                        report
                            .skipped
                            .extend(pending.by_ref().map(|invoice| invoice.invoice_id));
                        break;
                    }
                    tracing::debug!(invoice_id = %invoice.invoice_id, attempts, "invoice paid");
                    report.paid.push(invoice.invoice_id);
                }
                PaymentOutcome::Rejected(reason) => {
                    tracing::warn!(
                        invoice_id = %invoice.invoice_id,
                        attempts,
                        reason = %reason,
                        "payment rejected"
                    );
                    report.failed.push(FailedPayment {
                        invoice_id: invoice.invoice_id,
                        attempts,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            outcome = ?report.outcome(),
            paid = report.paid_count(),
            unsettled = report.unsettled_count(),
            "payment batch finished"
        );
        Ok(report)
    }

    /// Submits one invoice, retrying per policy. Returns the final outcome
    /// and the number of submissions made.
    async fn submit(&self, invoice: &Invoice) -> (PaymentOutcome, u32) {
        let request = PaymentRequest::from(invoice);
        let mut attempt = 1;

        loop {
            match self.provider.submit(&request).await {
                PaymentOutcome::Rejected(reason) if self.retry.should_retry(attempt, &reason) => {
                    let delay = self.retry.backoff(attempt);
                    tracing::debug!(
                        invoice_id = %request.id,
                        attempt,
                        ?delay,
                        reason = %reason,
                        "provider unreachable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return (outcome, attempt),
            }
        }
    }
}
