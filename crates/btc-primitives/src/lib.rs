//! Building blocks shared by the script and transaction crates: digests,
//! the txid hash type, compact-size integers with little-endian cursors,
//! and secp256k1 keys and signatures.

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod ec;

mod error;
pub use error::PrimitivesError;
