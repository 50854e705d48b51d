//! Inbound adapters: the CSV seed reader and the HTTP API.

pub mod csv;
pub mod http;
