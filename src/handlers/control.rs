//! `LOOP`/`REP`/`ENDLOOP`/`ENDREP`/`IF`/`IFC`/`ELSE`/`ENDIF`/`BREAK`/`BREAKC`/
//! `CALL`/`CALLNZ`/`LABEL`/`RET`.

use cranelift_entity::EntityRef;

use crate::environ::ShaderEnvironment;
use crate::error::{TranslateError, TranslateResult};
use crate::ids::{LabelId, TempId};
use crate::opcode::IrOp;
use crate::param::{DestParam, DstModifier, Immediate, ImmType, RegisterFile, SourceParam, NOSWIZZLE};
use crate::state::{LoopCounterLane, TranslationState};

use super::{emit_relational_compare, RelOp};

/// `LOOP aL, src`: `src.x` is the iteration count, `.y` the initial value,
/// `.z` the step. The counter is initialised to `init`, compared against
/// `init + iter*step`, and the body breaks once it's reached, since this
/// target has no native "loop N times" primitive to lower onto directly.
pub fn loop_begin<E: ShaderEnvironment>(
    env: &mut E,
    state: &mut TranslationState,
    info: &SourceParam,
) -> TranslateResult<()> {
    let iter = component(info, 0);
    let init = component(info, 1);
    let step = component(info, 2);
    let label = env.new_label();
    let mut err = None;
    let counter = state.push_loop(label, step.clone(), || match env.declare_loop_counter() {
        Ok(id) => id,
        Err(e) => {
            err = Some(e);
            TempId::new(0)
        }
    })?;
    if let Some(e) = err {
        return Err(e);
    }
    enter_counted_loop(env, label, counter, iter, init, step)
}

/// `REP src`: `src.x` is the iteration count; unlike `LOOP` there is no
/// explicit initial value or step, so the counter always runs `0, 1, 2, …`.
pub fn rep_begin<E: ShaderEnvironment>(
    env: &mut E,
    state: &mut TranslationState,
    info: &SourceParam,
) -> TranslateResult<()> {
    let iter = component(info, 0);
    let init = literal_int(0);
    let step = literal_int(1);
    let label = env.new_label();
    let mut err = None;
    let counter = state.push_rep(label, step.clone(), || match env.declare_loop_counter() {
        Ok(id) => id,
        Err(e) => {
            err = Some(e);
            TempId::new(0)
        }
    })?;
    if let Some(e) = err {
        return Err(e);
    }
    enter_counted_loop(env, label, counter, iter, init, step)
}

/// Shared `LOOP`/`REP` entry sequence: `ctr = init`, `limit = iter*step +
/// init` in a scratch temp, then the structured loop begins and immediately
/// breaks if `ctr >= limit` (covering the zero-iteration case).
fn enter_counted_loop<E: ShaderEnvironment>(
    env: &mut E,
    label: LabelId,
    counter: LoopCounterLane,
    iter: SourceParam,
    init: SourceParam,
    step: SourceParam,
) -> TranslateResult<()> {
    let counter_dst = loop_counter_dest(counter);
    env.emit(IrOp::Mov, &counter_dst, &[init.clone()])?;

    let limit = env.declare_scratch_temp()?;
    env.emit(IrOp::Mad, &scalar_dest(limit), &[iter, step, init])?;

    env.emit_loop_begin(label)?;

    let cmp = emit_relational_compare(env, RelOp::Ge, &loop_counter_source(counter), &scalar_source(limit))?;
    let cond = scalar_source_from_dest(&cmp);
    env.emit_break_if(&cond)
}

pub fn loop_end<E: ShaderEnvironment>(env: &mut E, state: &mut TranslationState) -> TranslateResult<()> {
    match state.pop_loop() {
        Some((label, counter, step)) => {
            let counter_dst = loop_counter_dest(counter);
            env.emit(IrOp::Add, &counter_dst, &[loop_counter_source(counter), step])?;
            env.emit_loop_end(label)
        }
        None => Err(TranslateError::Finalize(
            "ENDLOOP/ENDREP with no matching LOOP/REP".into(),
        )),
    }
}

/// Picks out one swizzle component of `src` and broadcasts it across all four
/// lanes, e.g. reading just `.y` of a `LOOP` info source as a scalar.
fn component(src: &SourceParam, lane: u8) -> SourceParam {
    let mut c = src.clone();
    c.swizzle = broadcast_swizzle(src.swizzle_component(lane));
    c
}

fn broadcast_swizzle(component: u8) -> u8 {
    let c = component & 0x3;
    c | (c << 2) | (c << 4) | (c << 6)
}

fn literal_int(value: i32) -> SourceParam {
    SourceParam {
        file: RegisterFile::Immediate,
        index: 0,
        relative: None,
        swizzle: NOSWIZZLE,
        modifier: crate::param::SrcModifier::None,
        imm: Some(Immediate {
            ty: ImmType::Int4,
            words: [value as u32; 4],
        }),
    }
}

fn loop_counter_dest(counter: LoopCounterLane) -> DestParam {
    DestParam {
        file: RegisterFile::Temp,
        index: counter.register.index() as u32,
        relative: None,
        writemask: 1 << counter.lane,
        modifier: DstModifier::None,
        shift: 0,
    }
}

fn loop_counter_source(counter: LoopCounterLane) -> SourceParam {
    SourceParam {
        file: RegisterFile::Temp,
        index: counter.register.index() as u32,
        relative: None,
        swizzle: broadcast_swizzle(counter.lane),
        modifier: crate::param::SrcModifier::None,
        imm: None,
    }
}

fn scalar_dest(temp: TempId) -> DestParam {
    DestParam {
        file: RegisterFile::Temp,
        index: temp.index() as u32,
        relative: None,
        writemask: 0b0001,
        modifier: DstModifier::None,
        shift: 0,
    }
}

fn scalar_source(temp: TempId) -> SourceParam {
    SourceParam {
        file: RegisterFile::Temp,
        index: temp.index() as u32,
        relative: None,
        swizzle: broadcast_swizzle(0),
        modifier: crate::param::SrcModifier::None,
        imm: None,
    }
}

pub fn if_begin<E: ShaderEnvironment>(
    env: &mut E,
    state: &mut TranslationState,
    cond: &SourceParam,
) -> TranslateResult<()> {
    let label = env.new_label();
    state.push_if(label)?;
    env.emit_if(cond, false, label)
}

pub fn ifc_begin<E: ShaderEnvironment>(
    env: &mut E,
    state: &mut TranslationState,
    flags: u8,
    lhs: &SourceParam,
    rhs: &SourceParam,
) -> TranslateResult<()> {
    let op = RelOp::from_flags(flags)?;
    let dst = emit_relational_compare(env, op, lhs, rhs)?;
    let cond = scalar_source_from_dest(&dst);
    if_begin(env, state, &cond)
}

pub fn else_branch<E: ShaderEnvironment>(env: &mut E, state: &mut TranslationState) -> TranslateResult<()> {
    if !state.mark_else() {
        return Err(TranslateError::Finalize("ELSE with no matching IF".into()));
    }
    env.emit_else()
}

pub fn endif<E: ShaderEnvironment>(env: &mut E, state: &mut TranslationState) -> TranslateResult<()> {
    match state.pop_if() {
        Some(label) => env.emit_endif(label),
        None => Err(TranslateError::Finalize("ENDIF with no matching IF".into())),
    }
}

pub fn breakc<E: ShaderEnvironment>(
    env: &mut E,
    flags: u8,
    lhs: &SourceParam,
    rhs: &SourceParam,
) -> TranslateResult<()> {
    let op = RelOp::from_flags(flags)?;
    let dst = emit_relational_compare(env, op, lhs, rhs)?;
    let cond = scalar_source_from_dest(&dst);
    env.emit_break_if(&cond)
}

pub fn call<E: ShaderEnvironment>(env: &mut E, target_label: u32) -> TranslateResult<()> {
    env.emit_call(target_label)
}

/// `CALLNZ a, b`: calls only if `b` (a const-bool source) is nonzero.
/// Lowered as `IF b CALL ENDIF` rather than a native conditional call.
pub fn call_nz<E: ShaderEnvironment>(
    env: &mut E,
    state: &mut TranslationState,
    target_label: u32,
    cond: &SourceParam,
) -> TranslateResult<()> {
    if_begin(env, state, cond)?;
    env.emit_call(target_label)?;
    endif(env, state)
}

pub fn label<E: ShaderEnvironment>(env: &mut E, index: u32) -> TranslateResult<()> {
    env.mark_label(index)
}

pub fn ret<E: ShaderEnvironment>(env: &mut E) -> TranslateResult<()> {
    env.emit_return()
}

pub fn brk<E: ShaderEnvironment>(env: &mut E) -> TranslateResult<()> {
    env.emit_break()
}

fn scalar_source_from_dest(dst: &crate::param::DestParam) -> SourceParam {
    SourceParam {
        file: dst.file,
        index: dst.index,
        relative: None,
        swizzle: crate::param::NOSWIZZLE,
        modifier: crate::param::SrcModifier::None,
        imm: None,
    }
}
