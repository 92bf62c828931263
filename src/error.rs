//! Error kinds and the fatal/recoverable split described by the translation's
//! error-handling design: unknown opcodes and version-gated instructions are
//! logged and skipped inline (see `driver`), never represented here. Only the
//! conditions that must abort translation get a `TranslateError` variant.

use thiserror::Error;

pub type TranslateResult<T> = Result<T, TranslateError>;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("invalid program header: {0}")]
    InvalidHeader(String),

    #[error("shader stage mismatch: header declared {header:?}, caller expected {expected:?}")]
    StageMismatch {
        header: crate::header::ShaderKind,
        expected: crate::header::ShaderKind,
    },

    #[error("allocation failure: {0}")]
    OutOfMemory(&'static str),

    #[error("unknown opcode 0x{0:04x}")]
    UnknownOpcode(u16),

    #[error("driver finalisation failed: {0}")]
    Finalize(String),
}
