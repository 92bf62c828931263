//! Translates legacy Direct3D Shader Model 1.0-3.0 bytecode programs into
//! calls against a [`ShaderEnvironment`] that builds real target IR.
//!
//! Wiring, top to bottom: [`header`] reads the program's kind/version word,
//! [`token`] walks the rest of the word stream, [`param`] decodes each
//! instruction's destination/source operand words, [`opcode`] maps the
//! opcode number to its arity/version-gate/handler, [`lower`] resolves a
//! decoded operand to the concrete register the environment declared for
//! it, and [`handlers`]/[`driver`] carry out everything that isn't a plain
//! one-opcode-in-one-op-out emission.

pub mod driver;
pub mod dump;
pub mod environ;
pub mod error;
pub mod handlers;
pub mod header;
pub mod ids;
pub mod lconst;
pub mod lower;
pub mod opcode;
pub mod param;
pub mod regenv;
pub mod state;
pub mod token;

pub use driver::Translator;
pub use environ::{ShaderCapabilities, ShaderEnvironment};
pub use error::{TranslateError, TranslateResult};
pub use header::{ProgramHeader, ShaderKind, Version};
pub use ids::{LabelId, SamplerId, TempId};
