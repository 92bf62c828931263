//! Top-level decode-dispatch-emit loop: the analogue of
//! `ModuleEnvironment`/`FuncTranslator` driving a single function body in a
//! WASM module translator, specialised to a single shader program's word
//! stream.
//!
//! One instruction word is decoded at a time. Its low 16 bits select an
//! [`Opcode`]; [`crate::opcode::lookup`] gives its fixed destination/source
//! arity, its version gate per shader stage, and either a generic target
//! opcode (read N sources, write one destination, emit) or a
//! [`HandlerId`] naming a special-cased routine in [`crate::handlers`].

use std::collections::HashMap;

use crate::environ::ShaderEnvironment;
use crate::error::{TranslateError, TranslateResult};
use crate::handlers::{self, constants::Declaration};
use crate::header::{ProgramHeader, ShaderKind, Version};
use crate::ids::SamplerId;
use crate::lconst::{LocalConstants, NUM_CONST_B, NUM_CONST_I};
use crate::lower::{dest::lower_dest, source::lower_source};
use crate::opcode::{self, HandlerId, Opcode};
use crate::param::{self, DestParam, RegisterFile, SourceParam, SrcModifier, NOSWIZZLE};
use crate::regenv::TextureKind;
use crate::state::TranslationState;
use crate::token::TokenReader;

const OPCODE_MASK: u32 = 0xffff;
const FLAGS_SHIFT: u32 = 16;
const COISSUE_BIT: u32 = 1 << 30;
const INSTLENGTH_SHIFT: u32 = 24;
const INSTLENGTH_MASK: u32 = 0xf << INSTLENGTH_SHIFT;
const COMMENT_OPCODE: u32 = 0xFFFE;
const COMMENT_SIZE_SHIFT: u32 = 16;
const COMMENT_SIZE_MASK: u32 = 0x7fff << COMMENT_SIZE_SHIFT;

/// Every float constant register this bytecode family can address
/// (`c0`..`c255`), the largest constant file any Shader Model 1-3 program
/// declares.
const MAX_CONST_SLOTS: u32 = 256;

/// Total constant-buffer slots to pre-declare: the float bank plus the
/// integer bank plus the boolean bank, the last packed four bools to a slot.
fn constant_buffer_slots() -> u32 {
    let bool_slots = (NUM_CONST_B as u32 + 3) / 4;
    MAX_CONST_SLOTS + NUM_CONST_I as u32 + bool_slots
}

/// Drives one program's word stream through decode, lowering, and emission
/// against a [`ShaderEnvironment`]. Stateless between programs; construct
/// one per translation.
pub struct Translator {
    sampler_kinds: HashMap<u32, TextureKind>,
}

impl Default for Translator {
    fn default() -> Self {
        Translator::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        Translator {
            sampler_kinds: HashMap::new(),
        }
    }

    /// Translates a full program: the header word followed by instruction
    /// tokens up to the `0x0000FFFF` end sentinel.
    pub fn translate<E: ShaderEnvironment>(&mut self, words: &[u32], env: &mut E) -> TranslateResult<()> {
        if words.is_empty() {
            return Err(TranslateError::InvalidHeader("empty token stream".into()));
        }
        let header = ProgramHeader::decode(words[0])?;
        if header.kind != env.shader_kind() {
            return Err(TranslateError::StageMismatch {
                header: header.kind,
                expected: env.shader_kind(),
            });
        }

        env.declare_constant_buffer(constant_buffer_slots())?;

        let mut reader = TokenReader::new(&words[1..]);
        let mut consts = LocalConstants::new();
        let mut state = TranslationState::new();

        while !reader.eof() {
            self.translate_instruction(&header, &mut reader, env, &mut consts, &mut state)?;
        }

        export_constants(env, &consts)?;
        env.finalize()
    }

    fn translate_instruction<E: ShaderEnvironment>(
        &mut self,
        header: &ProgramHeader,
        reader: &mut TokenReader,
        env: &mut E,
        consts: &mut LocalConstants,
        state: &mut TranslationState,
    ) -> TranslateResult<()> {
        let version = header.version;
        let word = reader.advance();

        if word & OPCODE_MASK == COMMENT_OPCODE {
            let size = ((word & COMMENT_SIZE_MASK) >> COMMENT_SIZE_SHIFT) as usize;
            let text = read_comment_text(reader, size);
            crate::dump::dump_comment(&text);
            return handlers::misc::comment(env, &text);
        }

        // The instruction-length field lets an SM2+ stream resync past an
        // instruction it can't decode; an SM1 stream has no such field, so an
        // unknown opcode there leaves no way to find the next instruction.
        if version.major >= 2 {
            let inst_len = ((word & INSTLENGTH_MASK) >> INSTLENGTH_SHIFT) as usize;
            reader.set_next(reader.position() + inst_len);
        }

        let raw_opcode = (word & OPCODE_MASK) as u16;
        let opcode = match Opcode::from_raw(raw_opcode) {
            Some(opcode) => opcode,
            None if version.major >= 2 => {
                log::warn!("unknown opcode 0x{:04x}, skipping", raw_opcode);
                reader.jump_to_next();
                return Ok(());
            }
            None => return Err(TranslateError::UnknownOpcode(raw_opcode)),
        };
        let flags = ((word >> FLAGS_SHIFT) & 0xff) as u8;
        let coissue = word & COISSUE_BIT != 0;
        if coissue {
            log::trace!("{:?} is co-issued; this target has no paired ALU slot to honor it", opcode);
        }

        let entry = opcode::lookup(opcode);
        let in_range = entry
            .range_for(header.kind)
            .map(|r| r.contains(version))
            .unwrap_or(false);
        if !in_range {
            if version.major >= 2 {
                log::warn!(
                    "{:?} is not valid for {:?} shader model {}.{}, skipping",
                    opcode,
                    header.kind,
                    version.major,
                    version.minor
                );
                reader.jump_to_next();
                return Ok(());
            }
            return Err(TranslateError::InvalidHeader(format!(
                "{:?} is not valid for {:?} shader model {}.{}",
                opcode, header.kind, version.major, version.minor
            )));
        }

        crate::dump::dump_instruction(opcode, None, &[]);
        self.dispatch(opcode, &entry, flags, version, header.kind, reader, env, consts, state)?;
        reader.jump_to_next();
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch<E: ShaderEnvironment>(
        &mut self,
        opcode: Opcode,
        entry: &opcode::OpcodeEntry,
        flags: u8,
        version: Version,
        stage: ShaderKind,
        reader: &mut TokenReader,
        env: &mut E,
        consts: &mut LocalConstants,
        state: &mut TranslationState,
    ) -> TranslateResult<()> {
        match entry.handler {
            Some(HandlerId::Def) => {
                let dst = decode_dst(reader, version);
                let imm = read_float_immediate(reader);
                handlers::constants::def(consts, dst.index, &imm);
                env.declare_float_const(dst.index, imm.as_f32x4())
            }
            Some(HandlerId::DefI) => {
                let dst = decode_dst(reader, version);
                let imm = read_int_immediate(reader);
                handlers::constants::defi(consts, dst.index, &imm);
                env.declare_int_const(dst.index, imm.as_i32x4())
            }
            Some(HandlerId::DefB) => {
                let dst = decode_dst(reader, version);
                let imm = read_bool_immediate(reader);
                handlers::constants::defb(consts, dst.index, &imm);
                env.declare_bool_const(dst.index, imm.as_bool())
            }
            Some(HandlerId::Dcl) => {
                let info = reader.advance();
                let dst = decode_dst(reader, version);
                self.dcl(env, stage, &dst, info)
            }
            Some(HandlerId::Mkxn(k, n)) => {
                let dst = decode_dst(reader, version);
                let dst = lower_dest(&dst, env)?;
                let vector = lower_src(reader, version, env, consts, state, stage)?;
                let matrix_row0 = lower_src(reader, version, env, consts, state, stage)?;
                handlers::matrix::mkxn(env, &dst, &vector, &matrix_row0, k, n)
            }
            Some(HandlerId::Call) => {
                let target = decode_src(reader, version);
                handlers::control::call(env, target.index)
            }
            Some(HandlerId::CallNz) => {
                let target = decode_src(reader, version);
                let cond = lower_src(reader, version, env, consts, state, stage)?;
                handlers::control::call_nz(env, state, target.index, &cond)
            }
            Some(HandlerId::Loop) => {
                let _counter_reg = decode_src(reader, version);
                let info = lower_src(reader, version, env, consts, state, stage)?;
                handlers::control::loop_begin(env, state, &info)
            }
            Some(HandlerId::Rep) => {
                let info = lower_src(reader, version, env, consts, state, stage)?;
                handlers::control::rep_begin(env, state, &info)
            }
            Some(HandlerId::EndLoop) | Some(HandlerId::EndRep) => handlers::control::loop_end(env, state),
            Some(HandlerId::If) => {
                let cond = lower_src(reader, version, env, consts, state, stage)?;
                handlers::control::if_begin(env, state, &cond)
            }
            Some(HandlerId::Ifc) => {
                let lhs = lower_src(reader, version, env, consts, state, stage)?;
                let rhs = lower_src(reader, version, env, consts, state, stage)?;
                handlers::control::ifc_begin(env, state, flags, &lhs, &rhs)
            }
            Some(HandlerId::Else) => handlers::control::else_branch(env, state),
            Some(HandlerId::EndIf) => handlers::control::endif(env, state),
            Some(HandlerId::BreakC) => {
                let lhs = lower_src(reader, version, env, consts, state, stage)?;
                let rhs = lower_src(reader, version, env, consts, state, stage)?;
                handlers::control::breakc(env, flags, &lhs, &rhs)
            }
            Some(HandlerId::Label) => {
                let target = decode_src(reader, version);
                handlers::control::label(env, target.index)
            }
            Some(HandlerId::Ret) => handlers::control::ret(env),
            Some(HandlerId::SinCos) => {
                let dst = decode_dst(reader, version);
                check_destination_writemask(opcode, &dst);
                let dst = lower_dest(&dst, env)?;
                let src = lower_src(reader, version, env, consts, state, stage)?;
                handlers::misc::sincos(env, version, &dst, &src)
            }
            Some(HandlerId::Nrm) => {
                let dst = decode_dst(reader, version);
                let dst = lower_dest(&dst, env)?;
                let src = lower_src(reader, version, env, consts, state, stage)?;
                handlers::misc::nrm(env, &dst, &src)
            }
            Some(HandlerId::TexCoordMov) => {
                let dst = decode_dst(reader, version);
                let raw_index = dst.index;
                let dst = lower_dest(&dst, env)?;
                handlers::texture::texcoord_mov(env, &dst, raw_index)
            }
            Some(HandlerId::Tex) => {
                let dst = decode_dst(reader, version);
                let dst = lower_dest(&dst, env)?;
                let coord = lower_src(reader, version, env, consts, state, stage)?;
                let sampler_reg = decode_src(reader, version);
                let sampler = self.declare_sampler_for_use(env, sampler_reg.index)?;
                handlers::texture::tex(env, &dst, &coord, sampler)
            }
            Some(HandlerId::TexLdd) => {
                let dst = decode_dst(reader, version);
                let dst = lower_dest(&dst, env)?;
                let coord = lower_src(reader, version, env, consts, state, stage)?;
                let ddx = lower_src(reader, version, env, consts, state, stage)?;
                let ddy = lower_src(reader, version, env, consts, state, stage)?;
                let sampler_reg = decode_src(reader, version);
                let sampler = self.declare_sampler_for_use(env, sampler_reg.index)?;
                handlers::texture::texldd(env, &dst, &coord, &ddx, &ddy, sampler)
            }
            Some(HandlerId::TexLdl) => {
                let dst = decode_dst(reader, version);
                let dst = lower_dest(&dst, env)?;
                let coord = lower_src(reader, version, env, consts, state, stage)?;
                let sampler_reg = decode_src(reader, version);
                let sampler = self.declare_sampler_for_use(env, sampler_reg.index)?;
                handlers::texture::texldl(env, &dst, &coord, sampler)
            }
            Some(HandlerId::TexKill) => {
                let dst = decode_dst(reader, version);
                let coord = dst_as_source(&dst);
                let coord = lower_source(&coord, env, consts, state, stage)?;
                handlers::texture::texkill(env, version, &coord)
            }
            Some(HandlerId::Phase) => {
                handlers::misc::phase()
            }
            Some(HandlerId::Comment) => Ok(()), // intercepted earlier; never reached
            Some(HandlerId::UnimplementedLegacy(name)) => {
                for _ in 0..entry.ndst {
                    decode_dst(reader, version);
                }
                for _ in 0..entry.nsrc {
                    decode_src(reader, version);
                }
                log::warn!("{} is not implemented, skipping", name);
                Ok(())
            }
            None => self.dispatch_generic(opcode, entry, version, env, consts, state, stage, reader),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch_generic<E: ShaderEnvironment>(
        &mut self,
        opcode: Opcode,
        entry: &opcode::OpcodeEntry,
        version: Version,
        env: &mut E,
        consts: &mut LocalConstants,
        state: &mut TranslationState,
        stage: ShaderKind,
        reader: &mut TokenReader,
    ) -> TranslateResult<()> {
        if let Some(target) = entry.target {
            let dst = decode_dst(reader, version);
            check_destination_writemask(opcode, &dst);
            let dst = lower_dest(&dst, env)?;
            let mut srcs = Vec::with_capacity(entry.nsrc as usize);
            for _ in 0..entry.nsrc {
                srcs.push(lower_src(reader, version, env, consts, state, stage)?);
            }
            return env.emit(target, &dst, &srcs);
        }

        // No target opcode and no special handler: either a genuine no-op
        // (NOP) or one whose only effect lives outside the generic emission
        // table (BREAK, BREAKP, TEXDEPTH).
        match opcode {
            Opcode::Break => handlers::control::brk(env),
            Opcode::BreakP => {
                let cond = lower_src(reader, version, env, consts, state, stage)?;
                env.emit_break_if(&cond)
            }
            Opcode::TexDepth => {
                decode_dst(reader, version);
                log::warn!("TEXDEPTH is not implemented, skipping");
                Ok(())
            }
            _ => {
                for _ in 0..entry.ndst {
                    decode_dst(reader, version);
                }
                for _ in 0..entry.nsrc {
                    decode_src(reader, version);
                }
                Ok(())
            }
        }
    }

    fn dcl<E: ShaderEnvironment>(
        &mut self,
        env: &mut E,
        stage: ShaderKind,
        dst: &DestParam,
        info: u32,
    ) -> TranslateResult<()> {
        let decl = match dst.file {
            RegisterFile::Sampler => {
                let kind = texture_kind_from_info(info);
                self.sampler_kinds.insert(dst.index, kind);
                Declaration::Sampler { index: dst.index, kind }
            }
            RegisterFile::Input if stage == ShaderKind::Vertex => Declaration::VsInput { index: dst.index },
            RegisterFile::Input => Declaration::FsInput {
                index: dst.index,
                centroid: dst.modifier == crate::param::DstModifier::Centroid,
            },
            RegisterFile::ColorOut if stage == ShaderKind::Fragment => {
                // fragment-stage `DCL` on a color-shaped input register
                // names a color varying, not the final render-target output.
                Declaration::FsColorInput { index: dst.index }
            }
            RegisterFile::ColorOut => Declaration::Output {
                index: dst.index,
                mask: dst.writemask,
                semantic: "color",
            },
            RegisterFile::Addr if stage == ShaderKind::Fragment => {
                Declaration::FsTexcoordInput { index: dst.index }
            }
            RegisterFile::Output | RegisterFile::RastOut | RegisterFile::AttrOut => Declaration::Output {
                index: dst.index,
                mask: dst.writemask,
                semantic: usage_name(info),
            },
            other => {
                log::warn!("DCL on unsupported register file {:?}, ignoring", other);
                return Ok(());
            }
        };
        handlers::constants::dcl(env, stage, decl)
    }

    fn declare_sampler_for_use<E: ShaderEnvironment>(&mut self, env: &mut E, index: u32) -> TranslateResult<SamplerId> {
        let kind = *self.sampler_kinds.entry(index).or_insert_with(|| {
            log::warn!("sampler {} used without a preceding DCL, defaulting to 2D", index);
            TextureKind::TwoD
        });
        env.declare_sampler(index, kind)
    }
}

fn decode_dst(reader: &mut TokenReader, version: Version) -> DestParam {
    let word = reader.advance();
    let mut dst = param::decode_dst_word(word);
    if param::has_relative_bit(word) {
        let next = if version.major >= 2 { Some(reader.advance()) } else { None };
        dst.relative = Some(Box::new(param::decode_relative(version, next)));
    }
    dst
}

fn decode_src(reader: &mut TokenReader, version: Version) -> SourceParam {
    let word = reader.advance();
    let mut src = param::decode_src_word(word);
    if param::has_relative_bit(word) {
        let next = if version.major >= 2 { Some(reader.advance()) } else { None };
        src.relative = Some(Box::new(param::decode_relative(version, next)));
    }
    src
}

#[allow(clippy::too_many_arguments)]
fn lower_src<E: ShaderEnvironment>(
    reader: &mut TokenReader,
    version: Version,
    env: &mut E,
    consts: &mut LocalConstants,
    state: &TranslationState,
    stage: ShaderKind,
) -> TranslateResult<SourceParam> {
    let raw = decode_src(reader, version);
    lower_source(&raw, env, consts, state, stage)
}

fn dst_as_source(dst: &DestParam) -> SourceParam {
    SourceParam {
        file: dst.file,
        index: dst.index,
        relative: dst.relative.clone(),
        swizzle: NOSWIZZLE,
        modifier: SrcModifier::None,
        imm: None,
    }
}

/// Post-decode sanity check run before a handler sees the destination: a
/// handful of opcodes can never legally define every writemask component
/// they're given, and a shader that asks anyway gets a warning rather than
/// silently undefined output.
fn check_destination_writemask(opcode: Opcode, dst: &DestParam) {
    match opcode {
        Opcode::Crs if dst.writemask & 0b1000 != 0 => {
            log::warn!("CRS destination writes .w, which a cross product never defines");
        }
        Opcode::SinCos if dst.writemask & 0b1100 != 0 => {
            log::warn!("SINCOS destination writes .zw, which sincos never defines");
        }
        _ => {}
    }
}

fn texture_kind_from_info(info: u32) -> TextureKind {
    const TEXTURE_TYPE_SHIFT: u32 = 27;
    match (info >> TEXTURE_TYPE_SHIFT) & 0xf {
        1 => TextureKind::OneD,
        3 => TextureKind::Cube,
        4 => TextureKind::ThreeD,
        _ => TextureKind::TwoD,
    }
}

fn usage_name(info: u32) -> &'static str {
    match info & 0x1f {
        0 => "position",
        1 => "blendweight",
        2 => "blendindices",
        3 => "normal",
        4 => "psize",
        5 => "texcoord",
        6 => "tangent",
        7 => "binormal",
        8 => "tessfactor",
        9 => "positiont",
        10 => "color",
        11 => "fog",
        12 => "depth",
        13 => "sample",
        _ => "generic",
    }
}

fn read_comment_text(reader: &mut TokenReader, size_in_words: usize) -> String {
    let mut bytes = Vec::with_capacity(size_in_words * 4);
    for _ in 0..size_in_words {
        bytes.extend_from_slice(&reader.advance().to_le_bytes());
    }
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn read_float_immediate(reader: &mut TokenReader) -> param::Immediate {
    param::Immediate {
        ty: param::ImmType::Float4,
        words: [reader.advance(), reader.advance(), reader.advance(), reader.advance()],
    }
}

fn read_int_immediate(reader: &mut TokenReader) -> param::Immediate {
    param::Immediate {
        ty: param::ImmType::Int4,
        words: [reader.advance(), reader.advance(), reader.advance(), reader.advance()],
    }
}

fn read_bool_immediate(reader: &mut TokenReader) -> param::Immediate {
    param::Immediate {
        ty: param::ImmType::Bool,
        words: [reader.advance(), 0, 0, 0],
    }
}

fn export_constants<E: ShaderEnvironment>(env: &mut E, consts: &LocalConstants) -> TranslateResult<()> {
    if !consts.has_indirect_access() {
        return Ok(());
    }
    for c in consts.float_consts() {
        env.declare_float_const(c.index, c.value)?;
    }
    for c in consts.int_consts() {
        env.declare_int_const(c.index, c.value)?;
    }
    for c in consts.bool_consts() {
        env.declare_bool_const(c.index, c.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environ::dummy::DummyEnvironment;

    fn header_word(kind_tag: u32, major: u8, minor: u8) -> u32 {
        (kind_tag << 16) | ((major as u32) << 8) | minor as u32
    }

    fn dst_word(file_lo: u32, file_hi: u32, index: u32, writemask: u32) -> u32 {
        ((file_lo & 0x7) << 28) | ((file_hi & 0x3) << 11) | (index & 0x7ff) | (writemask << 16)
    }

    fn src_word(file_lo: u32, file_hi: u32, index: u32) -> u32 {
        ((file_lo & 0x7) << 28) | ((file_hi & 0x3) << 11) | (index & 0x7ff) | (0b11_10_01_00 << 16)
    }

    /// `mov r0, v0` in a vs_1_1 program: header, MOV opcode word, a Temp dst
    /// and an Input src, then the end sentinel.
    #[test]
    fn translates_a_minimal_mov_program() {
        let words = [
            header_word(0xFFFE, 1, 1),
            1, // MOV opcode (no flags, no coissue, major<2 so no length field)
            dst_word(0, 0, 0, 0xf),
            src_word(1, 0, 0),
            0x0000_FFFF,
        ];
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let mut t = Translator::new();
        t.translate(&words, &mut env).unwrap();
        assert_eq!(env.emissions.len(), 1);
        assert!(env.finalized);
    }

    #[test]
    fn constant_buffer_covers_float_int_and_packed_bool_banks() {
        assert_eq!(constant_buffer_slots(), MAX_CONST_SLOTS + NUM_CONST_I as u32 + 4);
    }

    #[test]
    fn rejects_stage_mismatch() {
        let words = [header_word(0xFFFF, 1, 1), 0x0000_FFFF];
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let mut t = Translator::new();
        assert!(t.translate(&words, &mut env).is_err());
    }

    #[test]
    fn unknown_opcode_on_sm1_is_fatal() {
        // major < 2 carries no instruction-length field, so there is no way
        // to resync past an opcode the decoder doesn't recognize.
        let words = [header_word(0xFFFE, 1, 1), 200, 0x0000_FFFF];
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let mut t = Translator::new();
        assert!(t.translate(&words, &mut env).is_err());
    }

    #[test]
    fn unknown_opcode_on_sm2_is_skipped_not_fatal() {
        let words = [
            header_word(0xFFFE, 2, 0),
            200 | (0 << 24), // unknown opcode, inst length = 0 extra words
            1 | (2 << 24),   // MOV, inst length = 2 words
            dst_word(0, 0, 0, 0xf),
            src_word(1, 0, 0),
            0x0000_FFFF,
        ];
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let mut t = Translator::new();
        t.translate(&words, &mut env).unwrap();
        assert_eq!(env.emissions.len(), 1);
    }

    #[test]
    fn sm2_version_gated_opcode_is_skipped_not_fatal() {
        // LOOP is vs2+ only; in a vs_1_1 stream with an instruction-length
        // field of 2 (aL src + info src) the decoder should skip past it.
        let words = [
            header_word(0xFFFE, 2, 0),
            27 | (2 << 24), // LOOP, inst length = 2 words
            src_word(7, 1, 0), // aL (RegisterFile::Loop, tag 15)
            src_word(7, 0, 0), // loop info (RegisterFile::ConstInt)
            0x0000_FFFF,
        ];
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let mut t = Translator::new();
        // LOOP is valid for vs_2_0, so this should actually translate, not skip.
        t.translate(&words, &mut env).unwrap();
        // counter init, limit compute, LoopBegin, break compare, BreakIf
        assert_eq!(env.emissions.len(), 5);
        match &env.emissions[2] {
            crate::environ::dummy::Emission::LoopBegin(_) => {}
            other => panic!("expected a LoopBegin emission third, got {:?}", other),
        }
    }

    #[test]
    fn def_bakes_a_local_constant_and_exposes_it_to_the_buffer() {
        let words = [
            header_word(0xFFFE, 1, 1),
            81, // DEF
            dst_word(2, 0, 3, 0xf),
            1.0f32.to_bits(),
            2.0f32.to_bits(),
            3.0f32.to_bits(),
            4.0f32.to_bits(),
            0x0000_FFFF,
        ];
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let mut t = Translator::new();
        t.translate(&words, &mut env).unwrap();
        assert!(env.finalized);
    }

    #[test]
    fn comment_token_is_skipped_without_affecting_emission_count() {
        let words = [
            header_word(0xFFFE, 1, 1),
            0xFFFE | (2 << 16), // COMMENT, 2 words of payload
            0x6948u32,          // "Hi\0\0"
            0,
            1, // MOV
            dst_word(0, 0, 0, 0xf),
            src_word(1, 0, 0),
            0x0000_FFFF,
        ];
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let mut t = Translator::new();
        t.translate(&words, &mut env).unwrap();
        // one Comment emission for the dummy comment text, one Op for the MOV
        assert_eq!(env.emissions.len(), 2);
        match &env.emissions[0] {
            crate::environ::dummy::Emission::Comment(_) => {}
            other => panic!("expected a Comment emission first, got {:?}", other),
        }
    }

    #[test]
    fn crs_writing_w_warns_but_still_emits() {
        let words = [
            header_word(0xFFFE, 1, 1),
            33, // CRS
            dst_word(0, 0, 0, 0xf), // writes .xyzw, including .w
            src_word(1, 0, 0),
            src_word(1, 0, 1),
            0x0000_FFFF,
        ];
        let mut env = DummyEnvironment::new(ShaderKind::Vertex);
        let mut t = Translator::new();
        t.translate(&words, &mut env).unwrap();
        assert_eq!(env.emissions.len(), 1);
    }

    #[test]
    fn destination_writemask_check_flags_crs_w_and_sincos_zw() {
        let crs_dst = DestParam {
            file: RegisterFile::Temp,
            index: 0,
            relative: None,
            writemask: 0xf,
            modifier: crate::param::DstModifier::None,
            shift: 0,
        };
        // Neither call should panic; this only exercises that the check runs
        // without requiring a captured logger.
        check_destination_writemask(Opcode::Crs, &crs_dst);
        check_destination_writemask(Opcode::SinCos, &crs_dst);
        let mut xy_only = crs_dst.clone();
        xy_only.writemask = 0b0011;
        check_destination_writemask(Opcode::Crs, &xy_only);
        check_destination_writemask(Opcode::SinCos, &xy_only);
    }
}
