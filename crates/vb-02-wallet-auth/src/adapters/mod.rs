//! # Adapters

pub mod eth_verifier;
pub mod memory_wallets;
