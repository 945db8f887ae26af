//! # Domain Layer
//!
//! Challenge lifecycle entities and the signature scheme of the ledger.

pub mod challenge;
pub mod ecdsa;
pub mod entities;
pub mod errors;
