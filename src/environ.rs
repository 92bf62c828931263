//! The downstream collaborator this translator emits into.
//!
//! `ShaderEnvironment` is the seam between decoding/lowering (everything
//! else in this crate) and whatever builds the actual target-IR function —
//! that builder is out of scope here, so the driver only ever talks to it
//! through this trait, the same way a bytecode-to-IR translator hands every
//! emission off to a builder object it never constructs itself.

use crate::error::TranslateResult;
use crate::header::ShaderKind;
use crate::ids::{LabelId, SamplerId, TempId};
use crate::opcode::IrOp;
use crate::param::{DestParam, SourceParam};
use crate::regenv::TextureKind;

pub mod dummy;

/// Capabilities the target backend exposes; queried once at the start of
/// translation and consulted wherever the bytecode offers a choice (e.g.
/// whether predicated execution should lower to real predicate registers or
/// be emulated with `IF`/`ENDIF`).
pub trait ShaderCapabilities {
    fn native_integers(&self) -> bool;
    fn inline_subroutines(&self) -> bool;
    fn lower_predicates_to_control_flow(&self) -> bool;
    fn prefer_texcoord_semantic(&self) -> bool;
}

/// Emission surface for one shader program. Every method call here
/// corresponds to one unit of target-IR emission; this crate never
/// constructs target IR directly.
pub trait ShaderEnvironment {
    fn capabilities(&self) -> &dyn ShaderCapabilities;

    fn declare_temp(&mut self, index: u32) -> TranslateResult<TempId>;
    /// A fresh temporary not tied to any source-level register index, used
    /// for compiler-internal intermediates (e.g. a relational comparison's
    /// boolean result). Never cached: every call allocates a new one.
    fn declare_scratch_temp(&mut self) -> TranslateResult<TempId>;
    fn declare_address_register(&mut self) -> TranslateResult<TempId>;
    fn declare_predicate_register(&mut self) -> TranslateResult<TempId>;
    fn declare_loop_counter(&mut self) -> TranslateResult<TempId>;

    fn declare_vs_input(&mut self, index: u32) -> TranslateResult<TempId>;
    fn declare_fs_input(&mut self, index: u32, centroid: bool) -> TranslateResult<TempId>;
    fn declare_fs_color_input(&mut self, index: u32) -> TranslateResult<TempId>;
    fn declare_fs_texcoord_input(&mut self, index: u32, semantic_texcoord: bool) -> TranslateResult<TempId>;
    fn declare_output(&mut self, index: u32, mask: u8, semantic: &str) -> TranslateResult<TempId>;
    fn declare_color_output(&mut self, index: u32) -> TranslateResult<TempId>;
    fn declare_depth_output(&mut self) -> TranslateResult<TempId>;
    fn declare_sampler(&mut self, index: u32, kind: TextureKind) -> TranslateResult<SamplerId>;
    fn declare_fs_position(&mut self) -> TranslateResult<TempId>;
    fn declare_fs_face(&mut self) -> TranslateResult<TempId>;

    fn declare_float_const(&mut self, index: u32, value: [f32; 4]) -> TranslateResult<()>;
    fn declare_int_const(&mut self, index: u32, value: [i32; 4]) -> TranslateResult<()>;
    fn declare_bool_const(&mut self, index: u32, value: bool) -> TranslateResult<()>;
    fn declare_constant_buffer(&mut self, slots: u32) -> TranslateResult<()>;

    /// Emits a generic arithmetic op with a fully-lowered destination and
    /// sources (modifiers, swizzles, and relative addressing already
    /// resolved).
    fn emit(&mut self, op: IrOp, dst: &DestParam, srcs: &[SourceParam]) -> TranslateResult<()>;

    fn new_label(&mut self) -> LabelId;
    fn emit_loop_begin(&mut self, label: LabelId) -> TranslateResult<()>;
    fn emit_loop_end(&mut self, label: LabelId) -> TranslateResult<()>;
    fn emit_if(&mut self, cond: &SourceParam, invert: bool, label: LabelId) -> TranslateResult<()>;
    fn emit_else(&mut self) -> TranslateResult<()>;
    fn emit_endif(&mut self, label: LabelId) -> TranslateResult<()>;
    fn emit_break(&mut self) -> TranslateResult<()>;
    fn emit_break_if(&mut self, cond: &SourceParam) -> TranslateResult<()>;
    fn emit_call(&mut self, target: u32) -> TranslateResult<()>;
    fn emit_return(&mut self) -> TranslateResult<()>;
    fn mark_label(&mut self, index: u32) -> TranslateResult<()>;

    fn emit_texture_sample(
        &mut self,
        dst: &DestParam,
        coord: &SourceParam,
        sampler: SamplerId,
    ) -> TranslateResult<()>;
    fn emit_texture_kill(&mut self, coord: &SourceParam) -> TranslateResult<()>;
    fn emit_sincos(&mut self, dst: &DestParam, src: &SourceParam) -> TranslateResult<()>;
    fn emit_normalize(&mut self, dst: &DestParam, src: &SourceParam) -> TranslateResult<()>;

    fn emit_comment(&mut self, text: &str) -> TranslateResult<()>;

    fn shader_kind(&self) -> ShaderKind;

    fn finalize(&mut self) -> TranslateResult<()>;
}
