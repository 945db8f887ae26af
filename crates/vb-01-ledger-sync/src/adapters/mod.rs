//! # Adapters Module
//!
//! Infrastructure adapters implementing the outbound ports.

pub mod abi;
pub mod memory_ledger;
pub mod memory_store;
pub mod rpc;

#[cfg(feature = "rocksdb")]
pub mod rocksdb_store;
