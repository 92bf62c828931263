//! `DEF`/`DEFI`/`DEFB`: local-constant literal declarations.
//! `DCL`: input/output/sampler register declarations.

use crate::environ::ShaderEnvironment;
use crate::error::TranslateResult;
use crate::header::ShaderKind;
use crate::lconst::LocalConstants;
use crate::param::Immediate;
use crate::regenv::TextureKind;

pub fn def(consts: &mut LocalConstants, index: u32, imm: &Immediate) {
    consts.define_float(index, imm.as_f32x4());
}

pub fn defi(consts: &mut LocalConstants, index: u32, imm: &Immediate) {
    consts.define_int(index, imm.as_i32x4());
}

pub fn defb(consts: &mut LocalConstants, index: u32, imm: &Immediate) {
    consts.define_bool(index, imm.as_bool());
}

/// What a `DCL` token names, independent of which register file it targets.
pub enum Declaration {
    Sampler { index: u32, kind: TextureKind },
    VsInput { index: u32 },
    FsInput { index: u32, centroid: bool },
    FsColorInput { index: u32 },
    FsTexcoordInput { index: u32 },
    Output { index: u32, mask: u8, semantic: &'static str },
}

pub fn dcl<E: ShaderEnvironment>(env: &mut E, stage: ShaderKind, decl: Declaration) -> TranslateResult<()> {
    match decl {
        Declaration::Sampler { index, kind } => {
            env.declare_sampler(index, kind)?;
        }
        Declaration::VsInput { index } => {
            debug_assert_eq!(stage, ShaderKind::Vertex);
            env.declare_vs_input(index)?;
        }
        Declaration::FsInput { index, centroid } => {
            debug_assert_eq!(stage, ShaderKind::Fragment);
            env.declare_fs_input(index, centroid)?;
        }
        Declaration::FsColorInput { index } => {
            env.declare_fs_color_input(index)?;
        }
        Declaration::FsTexcoordInput { index } => {
            let texcoord = env.capabilities().prefer_texcoord_semantic();
            env.declare_fs_texcoord_input(index, texcoord)?;
        }
        Declaration::Output { index, mask, semantic } => {
            env.declare_output(index, mask, semantic)?;
        }
    }
    Ok(())
}
