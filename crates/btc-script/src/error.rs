/// Failures while building, tokenizing or reading scripts.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A script that cannot be built as requested, such as a bad multisig
    /// threshold.
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// `append_opcodes` was handed a push opcode; pushes go through
    /// `append_push_data`.
    #[error("{0} is a push opcode, append it with append_push_data")]
    InvalidOpcodeType(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A push announces more bytes than the script holds.
    #[error("push runs past the end of the script")]
    DataTooSmall,

    /// A payload longer than OP_PUSHDATA4 can describe.
    #[error("push payload exceeds OP_PUSHDATA4")]
    DataTooBig,

    #[error("invalid script number: {0}")]
    InvalidScriptNumber(String),

    #[error(transparent)]
    Primitives(#[from] btc_primitives::PrimitivesError),
}
