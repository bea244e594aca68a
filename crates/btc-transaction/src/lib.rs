//! Legacy transactions: the wire codec, size calculation, legacy sighash,
//! input signing, output templates and BIP69 ordering.

pub mod transaction;
pub mod input;
pub mod output;
pub mod encode;
pub mod size;
pub mod sighash;
pub mod signer;
pub mod template;
pub mod bip69;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
