//! Command line and environment configuration.

use crate::application::retry::RetryPolicy;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROVIDER_URL: &str = "http://payment-provider:8082/payments/pay";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8081";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// CSV file of invoices to load at startup (invoice_id, value, currency, paid)
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    #[command(flatten)]
    pub provider: ProviderSettings,

    #[command(flatten)]
    pub retry: RetrySettings,

    /// Address the HTTP API binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR, global = true)]
    pub listen: SocketAddr,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand to run, `serve` when none was given.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP API
    Serve,
    /// Run a single payment batch and print the report
    Pay,
    /// Print all invoices
    List,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ProviderSettings {
    /// Payment provider endpoint receiving one POST per invoice
    #[arg(
        long = "provider-url",
        env = "PAYMENT_PROVIDER_URL",
        default_value = DEFAULT_PROVIDER_URL,
        global = true
    )]
    pub url: String,

    /// Upper bound for a single provider call, in milliseconds
    #[arg(
        long = "provider-timeout-ms",
        env = "PAYMENT_PROVIDER_TIMEOUT_MS",
        default_value_t = 5000,
        global = true
    )]
    pub timeout_ms: u64,

    /// Use the in-process mock provider instead of calling out over HTTP
    #[arg(long = "mock-provider", global = true)]
    pub mock: bool,

    /// Invoice ids the mock provider rejects
    #[arg(long = "mock-reject", value_name = "ID", requires = "mock", global = true)]
    pub mock_reject: Vec<String>,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct RetrySettings {
    /// Submissions per invoice when the provider cannot be reached
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..), global = true)]
    pub max_attempts: u32,

    #[arg(long, default_value_t = 200, global = true)]
    pub initial_backoff_ms: u64,

    #[arg(long, default_value_t = 2000, global = true)]
    pub max_backoff_ms: u64,
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
        }
    }
}
