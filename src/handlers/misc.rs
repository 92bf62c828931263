//! `NRM`/`SINCOS`/`PHASE`/`COMMENT`: none of these fit the generic-emission
//! table entry because each needs either a scratch temporary (`NRM`), a
//! dedicated backend op (`SINCOS`), or no emission at all (`PHASE`,
//! `COMMENT` — both are translation metadata, surfaced only through
//! `crate::dump`).

use crate::environ::ShaderEnvironment;
use crate::error::TranslateResult;
use crate::header::Version;
use crate::param::{DestParam, SourceParam};

pub fn nrm<E: ShaderEnvironment>(env: &mut E, dst: &DestParam, src: &SourceParam) -> TranslateResult<()> {
    env.emit_normalize(dst, src)
}

/// `SINCOS` takes a macro-expanded Taylor approximation on Shader Model 1.x
/// and a dedicated instruction from 2.0 onward; this target only supports
/// the latter, so a 1.x stream gets skipped rather than miscompiled.
pub fn sincos<E: ShaderEnvironment>(
    env: &mut E,
    version: Version,
    dst: &DestParam,
    src: &SourceParam,
) -> TranslateResult<()> {
    if !version.at_least(2, 0) {
        log::warn!("SINCOS requires shader model 2.0 or later, skipping");
        return Ok(());
    }
    let mut dst = dst.clone();
    dst.writemask &= 0b0011; // only .xy are defined by SINCOS
    env.emit_sincos(&dst, src)
}

pub fn phase() -> TranslateResult<()> {
    Ok(())
}

pub fn comment<E: ShaderEnvironment>(env: &mut E, text: &str) -> TranslateResult<()> {
    env.emit_comment(text)
}
