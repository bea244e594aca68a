#![deny(missing_docs)]

//! Legacy Bitcoin transaction SDK.
//!
//! Re-exports the primitives, script and transaction crates for
//! single-crate usage, and provides the funding transaction builder used by
//! the `fund-tx` binary.

pub use btc_primitives as primitives;
pub use btc_script as script;
pub use btc_transaction as transaction;

pub mod funding;
