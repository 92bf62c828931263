//! Human-readable instruction dump, emitted at `trace!` level as each
//! instruction is decoded. Never affects translation; purely a debugging
//! aid.

use crate::opcode::Opcode;
use crate::param::{DestParam, SourceParam};

pub fn dump_instruction(opcode: Opcode, dst: Option<&DestParam>, srcs: &[SourceParam]) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    let mut line = format!("{:?}", opcode);
    if let Some(d) = dst {
        line.push_str(&format!(" {:?}.{:04b}", d.file, d.writemask));
    }
    for s in srcs {
        line.push_str(&format!(", {:?}[{}]", s.file, s.index));
    }
    log::trace!("{}", line);
}

pub fn dump_comment(text: &str) {
    log::trace!("; {}", text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{DstModifier, RegisterFile, SrcModifier, NOSWIZZLE};

    #[test]
    fn dump_does_not_panic_without_a_logger() {
        let dst = DestParam {
            file: RegisterFile::Temp,
            index: 0,
            relative: None,
            writemask: 0xf,
            modifier: DstModifier::None,
            shift: 0,
        };
        let src = SourceParam {
            file: RegisterFile::Const,
            index: 1,
            relative: None,
            swizzle: NOSWIZZLE,
            modifier: SrcModifier::None,
            imm: None,
        };
        dump_instruction(Opcode::Mov, Some(&dst), &[src]);
        dump_comment("test");
    }
}
