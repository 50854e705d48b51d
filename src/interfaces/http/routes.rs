use super::AppState;
use super::errors::{app_error_to_response, json_error};
use crate::application::report::{BatchOutcome, BatchReport};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn list_invoices(State(state): State<AppState>) -> Response {
    match state.store.list_all().await {
        Ok(invoices) => Json(invoices).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to list invoices");
            app_error_to_response(err)
        }
    }
}

pub async fn pay_invoices(State(state): State<AppState>) -> Response {
    // One batch per process at a time; overlapping triggers are turned away.
    let Ok(running) = state.batch_lock.clone().try_lock_owned() else {
        return json_error(
            StatusCode::CONFLICT,
            "batch_in_progress",
            "a payment batch is already running",
        );
    };

    // The batch runs detached from the request so a dropped connection
    // cannot cut it short between a provider call and its store write.
    let processor = state.processor.clone();
    let batch = tokio::spawn(async move {
        let _running = running;
        processor.run_payment_batch().await
    });

    match batch.await {
        Ok(Ok(report)) => batch_response(report),
        Ok(Err(err)) => {
            tracing::error!(error = %err, "payment batch aborted");
            app_error_to_response(err)
        }
        Err(err) => {
            tracing::error!(error = %err, "payment batch task failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "payment batch task failed",
            )
        }
    }
}

fn batch_response(report: BatchReport) -> Response {
    let outcome = report.outcome();
    let status = if report.has_unrecorded() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        match outcome {
            BatchOutcome::NothingToPay | BatchOutcome::AllPaid => StatusCode::OK,
            BatchOutcome::Partial | BatchOutcome::NonePaid => StatusCode::BAD_GATEWAY,
        }
    };

    (status, Json(report.summary())).into_response()
}
