//! Bitcoin scripts: opcodes, tokenizing into chunks, a minimal-push
//! compiler and script numbers.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod script_num;

mod error;
pub use error::ScriptError;
pub use script::{Script, ScriptToken};
pub use chunk::ScriptChunk;
