//! A reference `ShaderEnvironment` that records every emission as a plain
//! value instead of building real target IR. Exists so this crate's own
//! tests can drive the full decode/lower/dispatch pipeline without a real
//! GPU-IR backend attached — analogous to a do-nothing test harness for a
//! builder trait with a heavyweight real implementation.

use std::fmt;

use cranelift_entity::EntityRef;

use crate::error::TranslateResult;
use crate::header::ShaderKind;
use crate::ids::{LabelId, SamplerId, TempId};
use crate::opcode::IrOp;
use crate::param::{DestParam, SourceParam};
use crate::regenv::{RegisterEnvironment, TextureKind};

use super::{ShaderCapabilities, ShaderEnvironment};

/// A recorded emission, kept in program order for assertions in tests.
#[derive(Clone, Debug, PartialEq)]
pub enum Emission {
    Op {
        op: IrOp,
        dst: String,
        srcs: Vec<String>,
    },
    LoopBegin(u32),
    LoopEnd(u32),
    If { invert: bool, label: u32 },
    Else,
    EndIf(u32),
    Break,
    BreakIf,
    Call(u32),
    Return,
    Label(u32),
    TextureSample,
    TextureKill,
    SinCos,
    Normalize,
    Comment(String),
}

impl fmt::Display for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct DummyCapabilities {
    pub native_integers: bool,
    pub inline_subroutines: bool,
    pub lower_predicates_to_control_flow: bool,
    pub prefer_texcoord_semantic: bool,
}

impl ShaderCapabilities for DummyCapabilities {
    fn native_integers(&self) -> bool {
        self.native_integers
    }
    fn inline_subroutines(&self) -> bool {
        self.inline_subroutines
    }
    fn lower_predicates_to_control_flow(&self) -> bool {
        self.lower_predicates_to_control_flow
    }
    fn prefer_texcoord_semantic(&self) -> bool {
        self.prefer_texcoord_semantic
    }
}

pub struct DummyEnvironment {
    pub kind: ShaderKind,
    pub capabilities: DummyCapabilities,
    pub emissions: Vec<Emission>,
    regs: RegisterEnvironment,
    next_temp: u32,
    next_sampler: u32,
    next_label: u32,
    pub finalized: bool,
}

impl DummyEnvironment {
    pub fn new(kind: ShaderKind) -> Self {
        DummyEnvironment {
            kind,
            capabilities: DummyCapabilities::default(),
            emissions: Vec::new(),
            regs: RegisterEnvironment::new(),
            next_temp: 0,
            next_sampler: 0,
            next_label: 0,
            finalized: false,
        }
    }

    fn fresh_temp(&mut self) -> TempId {
        let id = TempId::new(self.next_temp as usize);
        self.next_temp += 1;
        id
    }
}

impl ShaderEnvironment for DummyEnvironment {
    fn capabilities(&self) -> &dyn ShaderCapabilities {
        &self.capabilities
    }

    fn declare_temp(&mut self, index: u32) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.temp(index) {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.insert_temp(index, id);
        Ok(id)
    }

    fn declare_scratch_temp(&mut self) -> TranslateResult<TempId> {
        Ok(self.fresh_temp())
    }

    fn declare_address_register(&mut self) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.address() {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.set_address(id);
        Ok(id)
    }

    fn declare_predicate_register(&mut self) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.predicate() {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.set_predicate(id);
        Ok(id)
    }

    fn declare_loop_counter(&mut self) -> TranslateResult<TempId> {
        Ok(self.fresh_temp())
    }

    fn declare_vs_input(&mut self, index: u32) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.input(index) {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.insert_input(index, id);
        Ok(id)
    }

    fn declare_fs_input(&mut self, index: u32, _centroid: bool) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.input(index) {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.insert_input(index, id);
        Ok(id)
    }

    fn declare_fs_color_input(&mut self, index: u32) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.fs_color_input(index) {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.set_fs_color_input(index, id);
        Ok(id)
    }

    fn declare_fs_texcoord_input(&mut self, index: u32, _semantic_texcoord: bool) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.fs_texcoord_input(index) {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.set_fs_texcoord_input(index, id);
        Ok(id)
    }

    fn declare_output(&mut self, index: u32, _mask: u8, _semantic: &str) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.output(index) {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.insert_output(index, id);
        Ok(id)
    }

    fn declare_color_output(&mut self, index: u32) -> TranslateResult<TempId> {
        if let Some(id) = self.regs.output(index) {
            return Ok(id);
        }
        let id = self.fresh_temp();
        self.regs.insert_output(index, id);
        Ok(id)
    }

    fn declare_depth_output(&mut self) -> TranslateResult<TempId> {
        Ok(self.fresh_temp())
    }

    fn declare_sampler(&mut self, index: u32, kind: TextureKind) -> TranslateResult<SamplerId> {
        if let Some((id, _)) = self.regs.sampler(index) {
            return Ok(id);
        }
        let id = SamplerId::new(self.next_sampler as usize);
        self.next_sampler += 1;
        self.regs.insert_sampler(index, id, kind);
        Ok(id)
    }

    fn declare_fs_position(&mut self) -> TranslateResult<TempId> {
        Ok(self.fresh_temp())
    }

    fn declare_fs_face(&mut self) -> TranslateResult<TempId> {
        Ok(self.fresh_temp())
    }

    fn declare_float_const(&mut self, _index: u32, _value: [f32; 4]) -> TranslateResult<()> {
        Ok(())
    }

    fn declare_int_const(&mut self, _index: u32, _value: [i32; 4]) -> TranslateResult<()> {
        Ok(())
    }

    fn declare_bool_const(&mut self, _index: u32, _value: bool) -> TranslateResult<()> {
        Ok(())
    }

    fn declare_constant_buffer(&mut self, _slots: u32) -> TranslateResult<()> {
        Ok(())
    }

    fn emit(&mut self, op: IrOp, dst: &DestParam, srcs: &[SourceParam]) -> TranslateResult<()> {
        self.emissions.push(Emission::Op {
            op,
            dst: format!("{:?}:{}", dst.file, dst.index),
            srcs: srcs
                .iter()
                .map(|s| format!("{:?}:{}", s.file, s.index))
                .collect(),
        });
        Ok(())
    }

    fn new_label(&mut self) -> LabelId {
        let id = LabelId::new(self.next_label as usize);
        self.next_label += 1;
        id
    }

    fn emit_loop_begin(&mut self, label: LabelId) -> TranslateResult<()> {
        self.emissions.push(Emission::LoopBegin(label.index() as u32));
        Ok(())
    }

    fn emit_loop_end(&mut self, label: LabelId) -> TranslateResult<()> {
        self.emissions.push(Emission::LoopEnd(label.index() as u32));
        Ok(())
    }

    fn emit_if(&mut self, _cond: &SourceParam, invert: bool, label: LabelId) -> TranslateResult<()> {
        self.emissions.push(Emission::If {
            invert,
            label: label.index() as u32,
        });
        Ok(())
    }

    fn emit_else(&mut self) -> TranslateResult<()> {
        self.emissions.push(Emission::Else);
        Ok(())
    }

    fn emit_endif(&mut self, label: LabelId) -> TranslateResult<()> {
        self.emissions.push(Emission::EndIf(label.index() as u32));
        Ok(())
    }

    fn emit_break(&mut self) -> TranslateResult<()> {
        self.emissions.push(Emission::Break);
        Ok(())
    }

    fn emit_break_if(&mut self, _cond: &SourceParam) -> TranslateResult<()> {
        self.emissions.push(Emission::BreakIf);
        Ok(())
    }

    fn emit_call(&mut self, target: u32) -> TranslateResult<()> {
        self.emissions.push(Emission::Call(target));
        Ok(())
    }

    fn emit_return(&mut self) -> TranslateResult<()> {
        self.emissions.push(Emission::Return);
        Ok(())
    }

    fn mark_label(&mut self, index: u32) -> TranslateResult<()> {
        self.emissions.push(Emission::Label(index));
        Ok(())
    }

    fn emit_texture_sample(
        &mut self,
        _dst: &DestParam,
        _coord: &SourceParam,
        _sampler: SamplerId,
    ) -> TranslateResult<()> {
        self.emissions.push(Emission::TextureSample);
        Ok(())
    }

    fn emit_texture_kill(&mut self, _coord: &SourceParam) -> TranslateResult<()> {
        self.emissions.push(Emission::TextureKill);
        Ok(())
    }

    fn emit_sincos(&mut self, _dst: &DestParam, _src: &SourceParam) -> TranslateResult<()> {
        self.emissions.push(Emission::SinCos);
        Ok(())
    }

    fn emit_normalize(&mut self, _dst: &DestParam, _src: &SourceParam) -> TranslateResult<()> {
        self.emissions.push(Emission::Normalize);
        Ok(())
    }

    fn emit_comment(&mut self, text: &str) -> TranslateResult<()> {
        self.emissions.push(Emission::Comment(text.to_string()));
        Ok(())
    }

    fn shader_kind(&self) -> ShaderKind {
        self.kind
    }

    fn finalize(&mut self) -> TranslateResult<()> {
        self.finalized = true;
        Ok(())
    }
}
