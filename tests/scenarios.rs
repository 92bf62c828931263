//! End-to-end scenarios driving [`sm1_translate::Translator`] against
//! [`sm1_translate::environ::dummy::DummyEnvironment`], analogous to
//! `cranelift-wasm`'s own integration tests against its `DummyEnvironment`.
//! Each scenario hand-assembles a bytecode word stream and asserts on the
//! recorded emission trace rather than on any real backend's output.

use sm1_translate::environ::dummy::{DummyEnvironment, Emission};
use sm1_translate::header::ShaderKind;
use sm1_translate::opcode::IrOp;
use sm1_translate::Translator;

const END: u32 = 0x0000_FFFF;

fn header_word(kind_tag: u32, major: u8, minor: u8) -> u32 {
    (kind_tag << 16) | ((major as u32) << 8) | minor as u32
}

fn dst_word(file_lo: u32, file_hi: u32, index: u32, writemask: u32) -> u32 {
    ((file_lo & 0x7) << 28) | ((file_hi & 0x3) << 11) | (index & 0x7ff) | (writemask << 16)
}

fn src_word(file_lo: u32, file_hi: u32, index: u32) -> u32 {
    ((file_lo & 0x7) << 28) | ((file_hi & 0x3) << 11) | (index & 0x7ff) | (0b11_10_01_00 << 16)
}

const REL_BIT: u32 = 1 << 31;

fn inst(opcode: u32, flags: u32, len: u32) -> u32 {
    opcode | (flags << 16) | (len << 24)
}

/// S1: an empty vertex program declares its constant buffer and finalizes
/// with no instructions emitted at all.
#[test]
fn s1_empty_vertex_program_finalizes_with_no_emissions() {
    let words = [header_word(0xFFFE, 1, 1), END];
    let mut env = DummyEnvironment::new(ShaderKind::Vertex);
    Translator::new().translate(&words, &mut env).unwrap();
    assert!(env.emissions.is_empty());
    assert!(env.finalized);
}

/// S2: `DEF c0, 1 2 3 4; MOV r0, c0; END` — the plain (non-indirect)
/// constant reference is inlined as a literal rather than read from the
/// constant file.
#[test]
fn s2_def_then_mov_inlines_the_local_constant() {
    let words = [
        header_word(0xFFFE, 2, 0),
        inst(81, 0, 5), // DEF, dst + 4 literal words
        dst_word(2, 0, 0, 0xf), // c0
        1.0f32.to_bits(),
        2.0f32.to_bits(),
        3.0f32.to_bits(),
        4.0f32.to_bits(),
        inst(1, 0, 2), // MOV, dst + src
        dst_word(0, 0, 0, 0xf), // r0
        src_word(2, 0, 0),      // c0
        END,
    ];
    let mut env = DummyEnvironment::new(ShaderKind::Vertex);
    Translator::new().translate(&words, &mut env).unwrap();
    assert_eq!(env.emissions.len(), 1);
    match &env.emissions[0] {
        Emission::Op { op, srcs, .. } => {
            assert_eq!(*op, IrOp::Mov);
            assert_eq!(srcs[0], "Immediate:0");
        }
        other => panic!("expected a single Mov op, got {:?}", other),
    }
}

/// S3: `DCL_2D s0; DCL_TEXCOORD0 t0; TEX r0, t0, s0; END` — the sampler
/// declared by `DCL` round-trips into the `TEX` that samples it.
#[test]
fn s3_declared_sampler_round_trips_into_tex() {
    let words = [
        header_word(0xFFFF, 2, 0),
        inst(31, 0, 2), // DCL, info + dst
        0,              // info: texture type bits = 0 -> 2D
        dst_word(2, 1, 0, 0xf), // s0 (Sampler, tag 10)
        inst(31, 0, 2),
        0,
        dst_word(3, 0, 0, 0xf), // t0 (Addr/texcoord alias, tag 3)
        inst(66, 0, 3), // TEX, dst + coord + sampler
        dst_word(0, 0, 0, 0xf),
        src_word(3, 0, 0), // t0
        src_word(2, 1, 0), // s0
        END,
    ];
    let mut env = DummyEnvironment::new(ShaderKind::Fragment);
    Translator::new().translate(&words, &mut env).unwrap();
    assert_eq!(env.emissions.len(), 1);
    assert_eq!(env.emissions[0], Emission::TextureSample);
}

/// S4: `DEF c0, …; MOV r0, c0[a0.x]; END` — relative addressing into the
/// constant file disables literal substitution and marks indirect access.
#[test]
fn s4_indirect_constant_access_bypasses_literal_substitution() {
    let words = [
        header_word(0xFFFE, 2, 0),
        inst(81, 0, 5),
        dst_word(2, 0, 0, 0xf),
        1.0f32.to_bits(),
        2.0f32.to_bits(),
        3.0f32.to_bits(),
        4.0f32.to_bits(),
        inst(1, 0, 3), // MOV, dst + rel src + relative sub-token
        dst_word(0, 0, 0, 0xf),
        src_word(2, 0, 0) | REL_BIT, // c0[a0...]
        src_word(3, 0, 0),           // a0, identity swizzle
        END,
    ];
    let mut env = DummyEnvironment::new(ShaderKind::Vertex);
    Translator::new().translate(&words, &mut env).unwrap();
    assert_eq!(env.emissions.len(), 1);
    match &env.emissions[0] {
        Emission::Op { op, srcs, .. } => {
            assert_eq!(*op, IrOp::Mov);
            assert_eq!(srcs[0], "Const:0");
        }
        other => panic!("expected a single Mov op reading Const:0, got {:?}", other),
    }
}

/// S5: `LOOP aL, i0; MOV r0, aL; ENDLOOP; END` — `i0 = (4, 0, 1, 0)` gives an
/// iteration count of 4, an initial value of 0, and a step of 1, so the
/// counter is materialized as `ctr = 0`, `limit = 4*1 + 0 = 4`, a break once
/// `ctr >= limit`, and `ctr += 1` at the end of each pass.
#[test]
fn s5_loop_body_references_the_live_loop_counter() {
    let words = [
        header_word(0xFFFE, 3, 0),
        inst(48, 0, 5), // DEFI i0, (4, 0, 1, 0)
        dst_word(7, 0, 0, 0xf),
        4,
        0,
        1,
        0,
        inst(27, 0, 2), // LOOP aL, i0
        src_word(7, 1, 0), // aL (RegisterFile::Loop, tag 15)
        src_word(7, 0, 0), // i0 (RegisterFile::ConstInt)
        inst(1, 0, 2),      // MOV r0, aL
        dst_word(0, 0, 0, 0xf),
        src_word(7, 1, 0),
        inst(29, 0, 0), // ENDLOOP
        END,
    ];
    let mut env = DummyEnvironment::new(ShaderKind::Vertex);
    Translator::new().translate(&words, &mut env).unwrap();
    assert_eq!(env.emissions.len(), 8);
    match &env.emissions[0] {
        Emission::Op { op, .. } => assert_eq!(*op, IrOp::Mov), // ctr = init
        other => panic!("expected the counter init Mov first, got {:?}", other),
    }
    match &env.emissions[1] {
        Emission::Op { op, .. } => assert_eq!(*op, IrOp::Mad), // limit = iter*step + init
        other => panic!("expected the limit Mad second, got {:?}", other),
    }
    let label = match &env.emissions[2] {
        Emission::LoopBegin(label) => *label,
        other => panic!("expected LoopBegin third, got {:?}", other),
    };
    match &env.emissions[3] {
        Emission::Op { op, .. } => assert_eq!(*op, IrOp::Sge), // ctr >= limit
        other => panic!("expected the break compare fourth, got {:?}", other),
    }
    assert_eq!(env.emissions[4], Emission::BreakIf);
    match &env.emissions[5] {
        Emission::Op { op, .. } => assert_eq!(*op, IrOp::Mov),
        other => panic!("expected the loop body's Mov, got {:?}", other),
    }
    match &env.emissions[6] {
        Emission::Op { op, .. } => assert_eq!(*op, IrOp::Add), // ctr += step
        other => panic!("expected the counter increment seventh, got {:?}", other),
    }
    match &env.emissions[7] {
        Emission::LoopEnd(end_label) => assert_eq!(*end_label, label),
        other => panic!("expected LoopEnd closing the same label, got {:?}", other),
    }
}

/// S6: `IFC_GT r0.x, c0.x; MOV oC0, c1; ELSE; MOV oC0, c2; ENDIF; END` — the
/// relational compare produces a scratch scalar that drives `IF`, and
/// `ELSE`/`ENDIF` bracket the two branches.
#[test]
fn s6_ifc_lowers_to_a_compare_then_structured_if_else() {
    let words = [
        header_word(0xFFFF, 2, 0),
        inst(41, 1, 2), // IFC, flags=Gt, lhs+rhs
        src_word(0, 0, 0), // r0.x
        src_word(2, 0, 0), // c0.x
        inst(1, 0, 2),      // MOV oC0, c1
        dst_word(0, 1, 0, 0xf), // oC0 (ColorOut, tag 8)
        src_word(2, 0, 1),
        inst(42, 0, 0), // ELSE
        inst(1, 0, 2),  // MOV oC0, c2
        dst_word(0, 1, 0, 0xf),
        src_word(2, 0, 2),
        inst(43, 0, 0), // ENDIF
        END,
    ];
    let mut env = DummyEnvironment::new(ShaderKind::Fragment);
    Translator::new().translate(&words, &mut env).unwrap();
    assert_eq!(env.emissions.len(), 6);
    match &env.emissions[0] {
        Emission::Op { op, .. } => assert_eq!(*op, IrOp::Sgt),
        other => panic!("expected the relational compare first, got {:?}", other),
    }
    let if_label = match &env.emissions[1] {
        Emission::If { invert, label } => {
            assert!(!invert);
            *label
        }
        other => panic!("expected If second, got {:?}", other),
    };
    match &env.emissions[2] {
        Emission::Op { op, .. } => assert_eq!(*op, IrOp::Mov),
        other => panic!("expected the then-branch Mov, got {:?}", other),
    }
    assert_eq!(env.emissions[3], Emission::Else);
    match &env.emissions[4] {
        Emission::Op { op, .. } => assert_eq!(*op, IrOp::Mov),
        other => panic!("expected the else-branch Mov, got {:?}", other),
    }
    match &env.emissions[5] {
        Emission::EndIf(label) => assert_eq!(*label, if_label),
        other => panic!("expected EndIf closing the same label, got {:?}", other),
    }
}
