//! Adapters for the domain ports.

pub mod http_provider;
pub mod in_memory;
pub mod mock;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
