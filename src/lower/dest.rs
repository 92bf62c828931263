//! Resolves a decoded destination parameter to the concrete register the
//! target environment should write, declaring it on first use the same way
//! `lower::source` does for reads.

use cranelift_entity::EntityRef;

use crate::environ::ShaderEnvironment;
use crate::error::TranslateResult;
use crate::param::{DestParam, RegisterFile};

pub fn lower_dest<E: ShaderEnvironment>(raw: &DestParam, env: &mut E) -> TranslateResult<DestParam> {
    let mut lowered = raw.clone();

    match raw.file {
        RegisterFile::Temp => {
            let id = env.declare_temp(raw.index)?;
            lowered.index = id.index() as u32;
        }
        RegisterFile::Addr => {
            let id = env.declare_address_register()?;
            lowered.index = id.index() as u32;
        }
        RegisterFile::Predicate => {
            let id = env.declare_predicate_register()?;
            lowered.index = id.index() as u32;
        }
        RegisterFile::ColorOut => {
            let id = env.declare_color_output(raw.index)?;
            lowered.index = id.index() as u32;
        }
        RegisterFile::DepthOut => {
            env.declare_depth_output()?;
            lowered.index = 0;
            lowered.writemask = 0b0100; // .z only
        }
        RegisterFile::Output => {
            let id = env.declare_output(raw.index, raw.writemask, "generic")?;
            lowered.index = id.index() as u32;
        }
        RegisterFile::RastOut | RegisterFile::AttrOut => {
            log::warn!(
                "{:?} destination is not representable in this target and was dropped",
                raw.file
            );
            lowered.writemask = 0;
        }
        RegisterFile::TempFloat16 => {
            log::warn!("16-bit temp destinations are unsupported, dropping write");
            lowered.writemask = 0;
        }
        RegisterFile::Input
        | RegisterFile::Const
        | RegisterFile::ConstInt
        | RegisterFile::ConstBool
        | RegisterFile::Sampler
        | RegisterFile::Loop
        | RegisterFile::Misc
        | RegisterFile::Label
        | RegisterFile::Immediate => {
            log::warn!("{:?} is not a valid destination file, dropping write", raw.file);
            lowered.writemask = 0;
        }
    }

    Ok(lowered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environ::dummy::DummyEnvironment;
    use crate::header::ShaderKind;
    use crate::param::DstModifier;

    fn raw_dst(file: RegisterFile, index: u32, writemask: u8) -> DestParam {
        DestParam {
            file,
            index,
            relative: None,
            writemask,
            modifier: DstModifier::None,
            shift: 0,
        }
    }

    #[test]
    fn depth_out_is_forced_to_z_component() {
        let mut env = DummyEnvironment::new(ShaderKind::Fragment);
        let raw = raw_dst(RegisterFile::DepthOut, 0, 0xf);
        let lowered = lower_dest(&raw, &mut env).unwrap();
        assert_eq!(lowered.writemask, 0b0100);
    }

    #[test]
    fn invalid_destination_file_is_dropped_not_fatal() {
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let raw = raw_dst(RegisterFile::Sampler, 0, 0xf);
        let lowered = lower_dest(&raw, &mut env).unwrap();
        assert!(lowered.is_nop());
    }

    #[test]
    fn color_out_index_is_remapped_through_the_environment() {
        let mut env = DummyEnvironment::new(ShaderKind::Fragment);
        let raw = raw_dst(RegisterFile::ColorOut, 2, 0xf);
        let lowered = lower_dest(&raw, &mut env).unwrap();
        assert_eq!(lowered.file, RegisterFile::ColorOut);
        assert_eq!(lowered.writemask, 0xf);
    }
}
