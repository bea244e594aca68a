//! Funding transaction builder.
//!
//! Spends one P2PKH output into a 2-of-2 P2WSH funding output plus a P2WPKH
//! change output back to the same key, signs the input with the legacy
//! sighash, and checks the result against an expected serialization.
//!
//! All inputs come from a `FundingFixture`, normally loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use btc_primitives::ec::PrivateKey;
use btc_primitives::PrimitivesError;
use btc_script::ScriptError;
use btc_transaction::sighash::SIGHASH_ALL;
use btc_transaction::template::{multisig, p2pkh, p2wpkh, p2wsh, UnlockingScriptTemplate};
use btc_transaction::{bip69, Transaction, TransactionError, TransactionInput};

/// The fixture bundled with the crate.
const REFERENCE_FIXTURE: &str = include_str!("../fixtures/funding.json");

/// Number of signatures required by the funding output.
const FUNDING_MULTISIG_THRESHOLD: usize = 2;

/// Errors that can occur while building or checking a funding transaction.
#[derive(Debug, thiserror::Error)]
pub enum FundingError {
    /// Building, signing or serializing the transaction failed.
    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// A key could not be parsed.
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),

    /// A script could not be built or decoded.
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// The fixture holds a value that cannot be used.
    #[error("invalid fixture: {0}")]
    Config(String),

    /// The fixture file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The fixture is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The built transaction differs from the expected serialization.
    #[error("transaction mismatch:\n  expected {expected}\n  actual   {actual}")]
    Mismatch {
        /// Expected hex.
        expected: String,
        /// Hex that was produced.
        actual: String,
    },
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// Everything needed to build one funding transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingFixture {
    /// Hex-encoded 32-byte private key owning the spent output.
    pub private_key: String,
    /// Display-order txid of the transaction being spent.
    pub funding_txid: String,
    /// Index of the spent output.
    pub funding_output_index: u32,
    /// Value locked into the 2-of-2 funding output.
    pub funding_satoshis: u64,
    /// Value returned to the funding key.
    pub change_satoshis: u64,
    /// Hex-encoded compressed public key of the local party.
    pub local_funding_pubkey: String,
    /// Hex-encoded compressed public key of the remote party.
    pub remote_funding_pubkey: String,
    /// Sighash type for the input signature.
    #[serde(default = "default_sighash_type")]
    pub sighash_type: u32,
    /// Serialization the result must match, if known.
    #[serde(default)]
    pub expected_hex: Option<String>,
}

fn default_sighash_type() -> u32 {
    SIGHASH_ALL
}

impl FundingFixture {
    /// Parse a fixture from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, FundingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a fixture file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FundingError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading funding fixture");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The fixture bundled with the crate.
    pub fn reference() -> Result<Self, FundingError> {
        Self::from_json(REFERENCE_FIXTURE)
    }

    /// Compare `actual_hex` against `expected_hex`.
    ///
    /// Passes when no expected hex is set. Hex case is ignored.
    ///
    /// # Returns
    /// `Ok(())` on a match, or `FundingError::Mismatch`.
    pub fn verify(&self, actual_hex: &str) -> Result<(), FundingError> {
        let Some(expected) = &self.expected_hex else {
            debug!("fixture has no expected hex, skipping comparison");
            return Ok(());
        };

        if expected.eq_ignore_ascii_case(actual_hex) {
            info!("funding transaction matches expected hex");
            return Ok(());
        }

        warn!(expected = %expected, actual = %actual_hex, "funding transaction mismatch");
        Err(FundingError::Mismatch {
            expected: expected.to_lowercase(),
            actual: actual_hex.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// A signed funding transaction.
#[derive(Debug, Clone)]
pub struct FundedTransaction {
    /// The signed transaction.
    pub transaction: Transaction,
    /// DER signature with the sighash type byte appended.
    pub signature: Vec<u8>,
    /// Hex serialization of `transaction`.
    pub hex: String,
}

/// Build and sign the funding transaction described by `fixture`.
///
/// Outputs are placed in BIP69 order before signing.
///
/// # Arguments
/// * `fixture` - Keys, outpoint, amounts and sighash type.
///
/// # Returns
/// The signed transaction with its signature and hex, or the first error
/// met while parsing the fixture, building scripts or signing.
pub fn build_funding_transaction(fixture: &FundingFixture) -> Result<FundedTransaction, FundingError> {
    let private_key = PrivateKey::from_hex(&fixture.private_key)?;
    let pubkey = private_key.pub_key().to_compressed();
    let local = decode_pubkey("localFundingPubkey", &fixture.local_funding_pubkey)?;
    let remote = decode_pubkey("remoteFundingPubkey", &fixture.remote_funding_pubkey)?;

    info!(
        txid = %fixture.funding_txid,
        vout = fixture.funding_output_index,
        funding = fixture.funding_satoshis,
        change = fixture.change_satoshis,
        "building funding transaction"
    );

    let mut tx = Transaction::new();

    let mut input =
        TransactionInput::from_txid_hex(&fixture.funding_txid, fixture.funding_output_index)?;
    // The legacy digest does not commit to the spent value.
    input.set_source_output(Some(p2pkh::output(&pubkey, 0)?));
    tx.add_input(input);

    let redeem_script = multisig::redeem_script(FUNDING_MULTISIG_THRESHOLD, &[local, remote])?;
    debug!(redeem_script = %redeem_script, asm = %redeem_script.to_asm(), "funding redeem script");
    tx.add_output(p2wsh::output(&redeem_script, fixture.funding_satoshis)?);
    tx.add_output(p2wpkh::output(&pubkey, fixture.change_satoshis)?);
    bip69::sort_outputs(&mut tx.outputs);

    let unlocker = p2pkh::unlock(private_key, Some(fixture.sighash_type));
    let unlocking_script = unlocker.sign(&tx, 0)?;
    let signature = unlocking_script
        .chunks()?
        .into_iter()
        .next()
        .and_then(|chunk| chunk.data)
        .ok_or_else(|| {
            TransactionError::SigningError("unlocking script has no signature push".to_string())
        })?;
    tx.inputs[0].script = unlocking_script;

    let hex = tx.to_hex()?;
    info!(txid = %tx.tx_id_hex()?, size = tx.size(), "signed funding transaction");

    Ok(FundedTransaction {
        transaction: tx,
        signature,
        hex,
    })
}

fn decode_pubkey(field: &str, value: &str) -> Result<Vec<u8>, FundingError> {
    hex::decode(value).map_err(|e| FundingError::Config(format!("{}: {}", field, e)))
}
