//! `M3x2`/`M3x3`/`M3x4`/`M4x3`/`M4x4`: multiplies a vector by a matrix given
//! as `n` consecutive registers starting at `src[1]`, each row dotted
//! against `src[0]` with a `k`-component dot product and written to one
//! component of the destination.

use crate::environ::ShaderEnvironment;
use crate::error::TranslateResult;
use crate::opcode::IrOp;
use crate::param::{DestParam, SourceParam};

pub fn mkxn<E: ShaderEnvironment>(
    env: &mut E,
    dst: &DestParam,
    vector: &SourceParam,
    matrix_row0: &SourceParam,
    k: u8,
    n: u8,
) -> TranslateResult<()> {
    let dot = match k {
        3 => IrOp::Dp3,
        4 => IrOp::Dp4,
        other => {
            log::warn!("invalid matrix row width {} for M{}x{}", other, k, n);
            return Ok(());
        }
    };

    for row in 0..n {
        let component_mask = 1u8 << row;
        if dst.writemask & component_mask == 0 {
            continue;
        }
        let mut row_dst = dst.clone();
        row_dst.writemask = component_mask;
        let mut row_src = matrix_row0.clone();
        row_src.index += row as u32;
        env.emit(dot, &row_dst, &[vector.clone(), row_src])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environ::dummy::DummyEnvironment;
    use crate::header::ShaderKind;
    use crate::param::{DstModifier, RegisterFile, SrcModifier, NOSWIZZLE};

    fn dst(mask: u8) -> DestParam {
        DestParam {
            file: RegisterFile::Temp,
            index: 0,
            relative: None,
            writemask: mask,
            modifier: DstModifier::None,
            shift: 0,
        }
    }

    fn src(file: RegisterFile, index: u32) -> SourceParam {
        SourceParam {
            file,
            index,
            relative: None,
            swizzle: NOSWIZZLE,
            modifier: SrcModifier::None,
            imm: None,
        }
    }

    #[test]
    fn m4x4_emits_four_dp4_rows() {
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let vector = src(RegisterFile::Temp, 0);
        let matrix = src(RegisterFile::Const, 4);
        mkxn(&mut env, &dst(0xf), &vector, &matrix, 4, 4).unwrap();
        assert_eq!(env.emissions.len(), 4);
    }

    #[test]
    fn partial_writemask_skips_unset_rows() {
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let vector = src(RegisterFile::Temp, 0);
        let matrix = src(RegisterFile::Const, 4);
        mkxn(&mut env, &dst(0b0101), &vector, &matrix, 3, 3).unwrap();
        assert_eq!(env.emissions.len(), 2);
    }

    #[test]
    fn matrix_row_index_increments_per_row() {
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let vector = src(RegisterFile::Temp, 0);
        let matrix = src(RegisterFile::Const, 10);
        mkxn(&mut env, &dst(0b11), &vector, &matrix, 3, 2).unwrap();
        match (&env.emissions[0], &env.emissions[1]) {
            (
                crate::environ::dummy::Emission::Op { srcs: s0, .. },
                crate::environ::dummy::Emission::Op { srcs: s1, .. },
            ) => {
                assert_ne!(s0[1], s1[1]);
            }
            _ => panic!("expected Op emissions"),
        }
    }
}
