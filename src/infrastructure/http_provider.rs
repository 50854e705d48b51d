use crate::domain::payment::{PaymentOutcome, PaymentRequest, RejectReason};
use crate::domain::ports::PaymentProvider;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Payment provider reached over HTTP.
///
/// Each payment is a `POST` of the JSON request to a single URL. Any 2xx
/// status counts as accepted; the response body is ignored.
#[derive(Clone)]
pub struct HttpPaymentProvider {
    url: String,
    client: reqwest::Client,
}

impl HttpPaymentProvider {
    /// Creates a client with the default timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeouts(url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Creates a client bounding every call by `timeout` and connection setup
    /// by `connect_timeout`.
    pub fn with_timeouts(
        url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let url = url.into();
        reqwest::Url::parse(&url)
            .map_err(|e| AppError::ConfigError(format!("Invalid provider URL '{url}': {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout.min(timeout))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Maps a client error onto a reject reason.
///
/// Connection failures are checked first: a connect timeout means the
/// request was never sent, which keeps it retry-safe.
fn classify(err: &reqwest::Error) -> RejectReason {
    if err.is_connect() {
        RejectReason::Unreachable(err.to_string())
    } else if err.is_timeout() {
        RejectReason::Timeout
    } else {
        RejectReason::Transport(err.to_string())
    }
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn submit(&self, request: &PaymentRequest) -> PaymentOutcome {
        let response = self.client.post(&self.url).json(request).send().await;

        match response {
            Ok(resp) if resp.status().is_success() => PaymentOutcome::Accepted,
            Ok(resp) => PaymentOutcome::Rejected(RejectReason::Status(resp.status().as_u16())),
            Err(err) => PaymentOutcome::Rejected(classify(&err)),
        }
    }
}
