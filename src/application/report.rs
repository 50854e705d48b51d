use crate::domain::payment::RejectReason;
use serde::Serialize;

/// An invoice the provider did not accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedPayment {
    pub invoice_id: String,
    pub attempts: u32,
    pub reason: RejectReason,
}

/// An invoice the provider accepted but the store failed to mark paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnrecordedPayment {
    pub invoice_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    NothingToPay,
    AllPaid,
    Partial,
    NonePaid,
}

/// Per-invoice result of one payment batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub paid: Vec<String>,
    pub failed: Vec<FailedPayment>,
    pub unrecorded: Vec<UnrecordedPayment>,
    /// Invoices never submitted because the batch halted early.
    pub skipped: Vec<String>,
}

/// The shape a batch result is reported in to callers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary<'a> {
    pub status: BatchOutcome,
    pub paid_count: usize,
    pub failed_count: usize,
    pub report: &'a BatchReport,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary<'_> {
        BatchSummary {
            status: self.outcome(),
            paid_count: self.paid_count(),
            failed_count: self.unsettled_count(),
            report: self,
        }
    }

    pub fn paid_count(&self) -> usize {
        self.paid.len()
    }

    /// Invoices from the snapshot that are still unpaid or unrecorded.
    pub fn unsettled_count(&self) -> usize {
        self.failed.len() + self.unrecorded.len() + self.skipped.len()
    }

    pub fn outcome(&self) -> BatchOutcome {
        match (self.paid_count(), self.unsettled_count()) {
            (0, 0) => BatchOutcome::NothingToPay,
            (_, 0) => BatchOutcome::AllPaid,
            (0, _) => BatchOutcome::NonePaid,
            _ => BatchOutcome::Partial,
        }
    }

    pub fn is_success(&self) -> bool {
        self.unsettled_count() == 0
    }

    pub fn has_unrecorded(&self) -> bool {
        !self.unrecorded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(id: &str) -> FailedPayment {
        FailedPayment {
            invoice_id: id.to_string(),
            attempts: 1,
            reason: RejectReason::Status(500),
        }
    }

    #[test]
    fn test_outcomes() {
        let mut report = BatchReport::default();
        assert_eq!(report.outcome(), BatchOutcome::NothingToPay);
        assert!(report.is_success());

        report.paid.push("A".into());
        assert_eq!(report.outcome(), BatchOutcome::AllPaid);

        report.failed.push(failed("B"));
        assert_eq!(report.outcome(), BatchOutcome::Partial);
        assert!(!report.is_success());

        report.paid.clear();
        assert_eq!(report.outcome(), BatchOutcome::NonePaid);
    }

    #[test]
    fn test_summary_json() {
        let report = BatchReport {
            paid: vec!["A".into()],
            failed: vec![failed("B")],
            ..Default::default()
        };
        let json = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(json["status"], "partial");
        assert_eq!(json["paidCount"], 1);
        assert_eq!(json["failedCount"], 1);
        assert_eq!(json["report"]["failed"][0]["invoiceId"], "B");
        assert_eq!(json["report"]["failed"][0]["reason"]["kind"], "status");
    }

    #[test]
    fn test_skipped_invoices_count_as_unsettled() {
        let report = BatchReport {
            paid: vec!["A".into()],
            skipped: vec!["C".into()],
            ..Default::default()
        };
        assert_eq!(report.unsettled_count(), 1);
        assert_eq!(report.outcome(), BatchOutcome::Partial);
    }
}
