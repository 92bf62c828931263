//! `TEX`/`TEXKILL`/`TEXLDD`/`TEXLDL`: texture sampling and the fragment-kill
//! instruction. The legacy `TEXBEM`/`TEXM3x*`/`TEXREG2*` family is version-
//! gated out below Shader Model 1.4 on real hardware and is kept stubbed
//! here too (see `crate::opcode::HandlerId::UnimplementedLegacy`), since it
//! depends on fixed-function texture-stage state this bytecode never
//! carries.

use crate::environ::ShaderEnvironment;
use crate::error::TranslateResult;
use crate::header::{ShaderKind, Version};
use crate::ids::SamplerId;
use crate::lconst::LocalConstants;
use crate::opcode::IrOp;
use crate::param::{DestParam, RegisterFile, SourceParam, SrcModifier, NOSWIZZLE};
use crate::state::TranslationState;

pub fn tex<E: ShaderEnvironment>(
    env: &mut E,
    dst: &DestParam,
    coord: &SourceParam,
    sampler: SamplerId,
) -> TranslateResult<()> {
    env.emit_texture_sample(dst, coord, sampler)
}

/// `TEXLDD`: samples with explicit screen-space derivatives (`ddx`/`ddy`).
/// This target's sampling surface only carries a coordinate and a sampler,
/// so the derivative operands are consumed (for arity accounting) and
/// otherwise left to the implicit derivatives the backend computes itself.
pub fn texldd<E: ShaderEnvironment>(
    env: &mut E,
    dst: &DestParam,
    coord: &SourceParam,
    _ddx: &SourceParam,
    _ddy: &SourceParam,
    sampler: SamplerId,
) -> TranslateResult<()> {
    log::warn!("TEXLDD derivative operands are not forwarded to the target sampler");
    env.emit_texture_sample(dst, coord, sampler)
}

/// `TEXLDL`: samples at an explicit LOD, carried in the coordinate's `.w`.
pub fn texldl<E: ShaderEnvironment>(
    env: &mut E,
    dst: &DestParam,
    coord: &SourceParam,
    sampler: SamplerId,
) -> TranslateResult<()> {
    env.emit_texture_sample(dst, coord, sampler)
}

/// `TEXCOORD`: below Shader Model 1.4 this just reads the texcoord input
/// aliased to `dst`'s index straight through, with no sampler involved —
/// the pre-1.4 encoding has no room for a second (sampler) operand.
pub fn texcoord_mov<E: ShaderEnvironment>(
    env: &mut E,
    dst: &DestParam,
    raw_index: u32,
) -> TranslateResult<()> {
    let raw_src = SourceParam {
        file: RegisterFile::Addr,
        index: raw_index,
        relative: None,
        swizzle: NOSWIZZLE,
        modifier: SrcModifier::None,
        imm: None,
    };
    let mut consts = LocalConstants::new();
    let state = TranslationState::new();
    let src = crate::lower::source::lower_source(&raw_src, env, &mut consts, &state, ShaderKind::Fragment)?;
    env.emit(IrOp::Mov, dst, &[src])
}

/// `TEXKILL`: only valid from Shader Model 1.4 onward.
pub fn texkill<E: ShaderEnvironment>(
    env: &mut E,
    version: Version,
    coord: &SourceParam,
) -> TranslateResult<()> {
    if !version.at_least(1, 4) {
        log::warn!("TEXKILL requires shader model 1.4 or later, skipping");
        return Ok(());
    }
    env.emit_texture_kill(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environ::dummy::DummyEnvironment;
    use crate::header::ShaderKind;
    use crate::param::{DstModifier, RegisterFile, SrcModifier, NOSWIZZLE};
    use cranelift_entity::EntityRef;

    fn coord() -> SourceParam {
        SourceParam {
            file: RegisterFile::Addr,
            index: 0,
            relative: None,
            swizzle: NOSWIZZLE,
            modifier: SrcModifier::None,
            imm: None,
        }
    }

    fn dst() -> DestParam {
        DestParam {
            file: RegisterFile::Temp,
            index: 0,
            relative: None,
            writemask: 0xf,
            modifier: DstModifier::None,
            shift: 0,
        }
    }

    #[test]
    fn texkill_below_sm14_is_skipped_not_fatal() {
        let mut env = DummyEnvironment::new(ShaderKind::Fragment);
        let v = Version { major: 1, minor: 1 };
        texkill(&mut env, v, &coord()).unwrap();
        assert!(env.emissions.is_empty());
    }

    #[test]
    fn texkill_at_sm14_emits() {
        let mut env = DummyEnvironment::new(ShaderKind::Fragment);
        let v = Version { major: 1, minor: 4 };
        texkill(&mut env, v, &coord()).unwrap();
        assert_eq!(env.emissions.len(), 1);
    }

    #[test]
    fn tex_emits_one_sample() {
        let mut env = DummyEnvironment::new(ShaderKind::Fragment);
        tex(&mut env, &dst(), &coord(), SamplerId::new(0)).unwrap();
        assert_eq!(env.emissions.len(), 1);
    }

    #[test]
    fn texcoord_emits_a_plain_mov() {
        let mut env = DummyEnvironment::new(ShaderKind::Fragment);
        texcoord_mov(&mut env, &dst(), 0).unwrap();
        match &env.emissions[0] {
            crate::environ::dummy::Emission::Op { op, .. } => assert_eq!(*op, IrOp::Mov),
            other => panic!("unexpected emission {:?}", other),
        }
    }
}
