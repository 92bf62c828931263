//! Special handlers: every opcode whose lowering is not a plain
//! "read N sources, write 1 destination" emission. Dispatched from
//! [`crate::driver`] by [`crate::opcode::HandlerId`].

use crate::environ::ShaderEnvironment;
use crate::error::TranslateResult;
use crate::header::Version;
use crate::opcode::IrOp;
use crate::param::{DestParam, DstModifier, RegisterFile, SourceParam};

pub mod constants;
pub mod control;
pub mod matrix;
pub mod misc;
pub mod texture;

/// The six relational operators `IFC`/`BREAKC` select between via the
/// instruction's flags byte.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RelOp {
    Gt,
    Eq,
    Ge,
    Lt,
    Ne,
    Le,
}

impl RelOp {
    pub fn from_flags(flags: u8) -> TranslateResult<RelOp> {
        Ok(match flags {
            1 => RelOp::Gt,
            2 => RelOp::Eq,
            3 => RelOp::Ge,
            4 => RelOp::Lt,
            5 => RelOp::Ne,
            6 => RelOp::Le,
            other => {
                return Err(crate::error::TranslateError::InvalidHeader(format!(
                    "invalid IFC/BREAKC comparison flags {}",
                    other
                )))
            }
        })
    }

    fn ir_op(self) -> IrOp {
        match self {
            RelOp::Gt => IrOp::Sgt,
            RelOp::Eq => IrOp::Seq,
            RelOp::Ge => IrOp::Sge,
            RelOp::Lt => IrOp::Slt,
            RelOp::Ne => IrOp::Sne,
            RelOp::Le => IrOp::Sle,
        }
    }
}

/// Evaluates `lhs <relop> rhs` into a scratch scalar and emits the
/// comparison as a single generic op. Shared between `IFC` and `BREAKC`,
/// which differ only in what they do with the boolean result.
pub fn emit_relational_compare<E: ShaderEnvironment>(
    env: &mut E,
    op: RelOp,
    lhs: &SourceParam,
    rhs: &SourceParam,
) -> TranslateResult<DestParam> {
    let scratch = env.declare_scratch_temp()?;
    let dst = DestParam {
        file: RegisterFile::Temp,
        index: scratch_index(scratch),
        relative: None,
        writemask: 0b0001,
        modifier: DstModifier::None,
        shift: 0,
    };
    env.emit(op.ir_op(), &dst, &[lhs.clone(), rhs.clone()])?;
    Ok(dst)
}

fn scratch_index(id: crate::ids::TempId) -> u32 {
    use cranelift_entity::EntityRef;
    id.index() as u32
}

/// `LOOP`/`REP`/`CALL`/`IF` and friends only exist from Shader Model 2.0
/// onward; `major < 2` streams have no structured control flow at all.
pub fn requires_structured_control_flow(version: Version) -> bool {
    version.major >= 2
}
