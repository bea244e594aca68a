use btc_primitives::PrimitivesError;

/// Everything that can go wrong while building, coding or signing a
/// transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// The signer refused the input, e.g. its source output is locked to
    /// another key.
    #[error("signing error: {0}")]
    SigningError(String),
    /// Malformed hex or wire bytes, or an encoding that came out the wrong
    /// size.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// Not ALL, NONE or SINGLE with an optional ANYONECANPAY bit.
    #[error("invalid sighash type: {0:#04x}")]
    InvalidSighashType(u32),
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
    /// A template key that is neither 33 nor 65 bytes with a matching prefix.
    #[error("invalid public key length: {0}")]
    InvalidKeyLength(usize),
    /// An empty witness script, or one past the consensus size limit.
    #[error("invalid script length: {0}")]
    InvalidScriptLength(usize),
    #[error("input index {index} out of range (tx has {count} inputs)")]
    InputIndexOutOfRange { index: usize, count: usize },
    #[error("script error: {0}")]
    Script(#[from] btc_script::ScriptError),
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}

/// Turn a failed wire read into a `SerializationError` naming the field.
pub(crate) fn reading(field: &'static str) -> impl FnOnce(PrimitivesError) -> TransactionError {
    move |e| TransactionError::SerializationError(format!("reading {}: {}", field, e))
}
