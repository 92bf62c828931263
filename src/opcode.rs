//! Instruction Table: a flat, immutable table keyed by source opcode, giving
//! the target IR opcode (when the lowering is a generic 1:1 emission), the
//! supported bytecode-version range per shader stage, the fixed destination/
//! source arity, and an optional special-handler tag.
//!
//! This is the direct analogue of `cranelift-wasm`'s dispatch over
//! `wasmparser::Operator`: there, a `match` arm per operator IS the table;
//! here the decoder reads an opcode *number* off the wire first, so the table
//! is reified as data rather than as match arms, but the dispatch contract
//! (§4.3 of the translation design) is identical: look up, version-gate, read
//! operands, hand off to a handler or the generic emitter.

use crate::header::{ShaderKind, Version};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Opcode {
    Nop,
    Mov,
    Add,
    Sub,
    Mad,
    Mul,
    Rcp,
    Rsq,
    Dp3,
    Dp4,
    Min,
    Max,
    Slt,
    Sge,
    Exp,
    Log,
    Lit,
    Dst,
    Lrp,
    Frc,
    M4x4,
    M4x3,
    M3x4,
    M3x3,
    M3x2,
    Call,
    CallNz,
    Loop,
    Ret,
    EndLoop,
    Label,
    Dcl,
    Pow,
    Crs,
    Sgn,
    Abs,
    Nrm,
    SinCos,
    Rep,
    EndRep,
    If,
    Ifc,
    Else,
    EndIf,
    Break,
    BreakC,
    Mova,
    DefB,
    DefI,
    TexCoord,
    TexKill,
    Tex,
    TexBem,
    TexBeml,
    TexReg2Ar,
    TexReg2Gb,
    TexM3x2Pad,
    TexM3x2Tex,
    TexM3x3Pad,
    TexM3x3Tex,
    TexM3x3Spec,
    TexM3x3VSpec,
    ExpP,
    LogP,
    Cnd,
    Def,
    TexReg2Rgb,
    TexDp3Tex,
    TexM3x2Depth,
    TexDp3,
    TexM3x3,
    TexDepth,
    Cmp,
    Bem,
    Dp2Add,
    Dsx,
    Dsy,
    TexLdd,
    SetP,
    TexLdl,
    BreakP,
    Phase,
    Comment,
}

impl Opcode {
    /// Maps the raw 16-bit opcode field (the low bits of an instruction
    /// token) to a symbolic opcode. `PHASE`/`COMMENT` use reserved high
    /// values that never collide with a real opcode number.
    pub fn from_raw(raw: u16) -> Option<Opcode> {
        use Opcode::*;
        Some(match raw {
            0 => Nop,
            1 => Mov,
            2 => Add,
            3 => Sub,
            4 => Mad,
            5 => Mul,
            6 => Rcp,
            7 => Rsq,
            8 => Dp3,
            9 => Dp4,
            10 => Min,
            11 => Max,
            12 => Slt,
            13 => Sge,
            14 => Exp,
            15 => Log,
            16 => Lit,
            17 => Dst,
            18 => Lrp,
            19 => Frc,
            20 => M4x4,
            21 => M4x3,
            22 => M3x4,
            23 => M3x3,
            24 => M3x2,
            25 => Call,
            26 => CallNz,
            27 => Loop,
            28 => Ret,
            29 => EndLoop,
            30 => Label,
            31 => Dcl,
            32 => Pow,
            33 => Crs,
            34 => Sgn,
            35 => Abs,
            36 => Nrm,
            37 => SinCos,
            38 => Rep,
            39 => EndRep,
            40 => If,
            41 => Ifc,
            42 => Else,
            43 => EndIf,
            44 => Break,
            45 => BreakC,
            46 => Mova,
            47 => DefB,
            48 => DefI,
            64 => TexCoord,
            65 => TexKill,
            66 => Tex,
            67 => TexBem,
            68 => TexBeml,
            69 => TexReg2Ar,
            70 => TexReg2Gb,
            71 => TexM3x2Pad,
            72 => TexM3x2Tex,
            73 => TexM3x3Pad,
            74 => TexM3x3Tex,
            76 => TexM3x3Spec,
            77 => TexM3x3VSpec,
            78 => ExpP,
            79 => LogP,
            80 => Cnd,
            81 => Def,
            82 => TexReg2Rgb,
            83 => TexDp3Tex,
            84 => TexM3x2Depth,
            85 => TexDp3,
            86 => TexM3x3,
            87 => TexDepth,
            88 => Cmp,
            89 => Bem,
            90 => Dp2Add,
            91 => Dsx,
            92 => Dsy,
            93 => TexLdd,
            94 => SetP,
            95 => TexLdl,
            96 => BreakP,
            0xFFFD => Phase,
            0xFFFE => Comment,
            _ => return None,
        })
    }
}

/// The target IR's opcode set for the handful of lowerings that are a plain
/// 1:1 emission (no control flow, no indirection into the register
/// environment beyond ordinary source/destination resolution).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IrOp {
    Mov,
    Add,
    Sub,
    Mad,
    Mul,
    Rcp,
    Rsq,
    Dp3,
    Dp4,
    Min,
    Max,
    Slt,
    Sge,
    Sgt,
    Seq,
    Sne,
    Sle,
    Exp,
    Log,
    Lit,
    Dst,
    Lrp,
    Frc,
    Pow,
    Crs,
    Ssg,
    Abs,
    Cnd,
    Cmp,
    Dp2A,
    Ddx,
    Ddy,
}

#[derive(Copy, Clone, Debug)]
pub struct VersionRange {
    pub min: Version,
    pub max: Version,
}

impl VersionRange {
    pub const fn new(min_major: u8, min_minor: u8, max_major: u8, max_minor: u8) -> Self {
        VersionRange {
            min: Version {
                major: min_major,
                minor: min_minor,
            },
            max: Version {
                major: max_major,
                minor: max_minor,
            },
        }
    }

    pub fn contains(&self, v: Version) -> bool {
        (v.major, v.minor) >= (self.min.major, self.min.minor)
            && (v.major, v.minor) <= (self.max.major, self.max.minor)
    }
}

/// Which non-generic handler a given opcode dispatches to. Contracted in
/// `crate::handlers`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HandlerId {
    Mkxn(u8, u8),
    Call,
    CallNz,
    Loop,
    Rep,
    EndLoop,
    EndRep,
    If,
    Ifc,
    Else,
    EndIf,
    BreakC,
    Label,
    Ret,
    SinCos,
    Nrm,
    Def,
    DefI,
    DefB,
    Dcl,
    Tex,
    TexKill,
    TexLdd,
    TexLdl,
    /// `TEXCOORD`: reads the texcoord input aliased to this destination's
    /// index directly, with no sampler involved.
    TexCoordMov,
    Phase,
    Comment,
    /// Legacy bump-mapping/matrix-pad texture family; the original Mesa
    /// decoder leaves these as stubs returning `D3DERR_INVALIDCALL` and the
    /// translation design keeps them that way deliberately (see DESIGN.md).
    UnimplementedLegacy(&'static str),
}

pub struct OpcodeEntry {
    pub target: Option<IrOp>,
    pub vs_range: Option<VersionRange>,
    pub ps_range: Option<VersionRange>,
    pub ndst: u8,
    pub nsrc: u8,
    pub handler: Option<HandlerId>,
}

impl OpcodeEntry {
    pub fn range_for(&self, stage: ShaderKind) -> Option<VersionRange> {
        match stage {
            ShaderKind::Vertex => self.vs_range,
            ShaderKind::Fragment => self.ps_range,
        }
    }
}

const ALL: VersionRange = VersionRange::new(1, 0, 3, 0);
const SM14: VersionRange = VersionRange::new(1, 4, 1, 4);
const SM2: VersionRange = VersionRange::new(2, 0, 3, 0);
const SM3: VersionRange = VersionRange::new(3, 0, 3, 0);
const SM1_TO_1_3: VersionRange = VersionRange::new(1, 0, 1, 3);

macro_rules! entry {
    ($target:expr, $vs:expr, $ps:expr, $ndst:expr, $nsrc:expr, $handler:expr) => {
        OpcodeEntry {
            target: $target,
            vs_range: $vs,
            ps_range: $ps,
            ndst: $ndst,
            nsrc: $nsrc,
            handler: $handler,
        }
    };
}

pub fn lookup(op: Opcode) -> OpcodeEntry {
    use Opcode::*;
    match op {
        Nop => entry!(None, Some(ALL), Some(ALL), 0, 0, None),
        Mov => entry!(Some(IrOp::Mov), Some(ALL), Some(ALL), 1, 1, None),
        Add => entry!(Some(IrOp::Add), Some(ALL), Some(ALL), 1, 2, None),
        Sub => entry!(Some(IrOp::Sub), Some(ALL), Some(ALL), 1, 2, None),
        Mad => entry!(Some(IrOp::Mad), Some(ALL), Some(ALL), 1, 3, None),
        Mul => entry!(Some(IrOp::Mul), Some(ALL), Some(ALL), 1, 2, None),
        Rcp => entry!(Some(IrOp::Rcp), Some(ALL), Some(ALL), 1, 1, None),
        Rsq => entry!(Some(IrOp::Rsq), Some(ALL), Some(ALL), 1, 1, None),
        Dp3 => entry!(Some(IrOp::Dp3), Some(ALL), Some(ALL), 1, 2, None),
        Dp4 => entry!(Some(IrOp::Dp4), Some(ALL), Some(ALL), 1, 2, None),
        Min => entry!(Some(IrOp::Min), Some(ALL), Some(ALL), 1, 2, None),
        Max => entry!(Some(IrOp::Max), Some(ALL), Some(ALL), 1, 2, None),
        Slt => entry!(Some(IrOp::Slt), Some(ALL), Some(ALL), 1, 2, None),
        Sge => entry!(Some(IrOp::Sge), Some(ALL), Some(ALL), 1, 2, None),
        Exp => entry!(Some(IrOp::Exp), Some(ALL), Some(ALL), 1, 1, None),
        Log => entry!(Some(IrOp::Log), Some(ALL), Some(ALL), 1, 1, None),
        Lit => entry!(Some(IrOp::Lit), Some(ALL), None, 1, 1, None),
        Dst => entry!(Some(IrOp::Dst), Some(ALL), None, 1, 2, None),
        Lrp => entry!(Some(IrOp::Lrp), Some(SM2), Some(ALL), 1, 3, None),
        Frc => entry!(Some(IrOp::Frc), Some(ALL), Some(ALL), 1, 1, None),
        M4x4 => entry!(None, Some(ALL), Some(ALL), 1, 2, Some(HandlerId::Mkxn(4, 4))),
        M4x3 => entry!(None, Some(ALL), Some(ALL), 1, 2, Some(HandlerId::Mkxn(4, 3))),
        M3x4 => entry!(None, Some(ALL), Some(ALL), 1, 2, Some(HandlerId::Mkxn(3, 4))),
        M3x3 => entry!(None, Some(ALL), Some(ALL), 1, 2, Some(HandlerId::Mkxn(3, 3))),
        M3x2 => entry!(None, Some(ALL), Some(ALL), 1, 2, Some(HandlerId::Mkxn(3, 2))),
        Call => entry!(None, Some(SM2), Some(SM2), 0, 1, Some(HandlerId::Call)),
        CallNz => entry!(None, Some(SM2), Some(SM2), 0, 2, Some(HandlerId::CallNz)),
        Loop => entry!(None, Some(SM2), Some(SM3), 0, 2, Some(HandlerId::Loop)),
        Ret => entry!(None, Some(SM2), Some(SM2), 0, 0, Some(HandlerId::Ret)),
        EndLoop => entry!(None, Some(SM2), Some(SM3), 0, 0, Some(HandlerId::EndLoop)),
        Label => entry!(None, Some(SM2), Some(SM2), 0, 1, Some(HandlerId::Label)),
        Dcl => entry!(None, Some(ALL), Some(ALL), 1, 0, Some(HandlerId::Dcl)),
        Pow => entry!(Some(IrOp::Pow), Some(SM2), Some(SM2), 1, 2, None),
        Crs => entry!(Some(IrOp::Crs), Some(ALL), Some(ALL), 1, 2, None),
        Sgn => entry!(Some(IrOp::Ssg), Some(SM2), None, 1, 3, None),
        Abs => entry!(Some(IrOp::Abs), Some(ALL), Some(ALL), 1, 1, None),
        Nrm => entry!(None, Some(ALL), Some(ALL), 1, 1, Some(HandlerId::Nrm)),
        SinCos => entry!(None, Some(ALL), Some(ALL), 1, 1, Some(HandlerId::SinCos)),
        Rep => entry!(None, Some(SM2), Some(SM2), 0, 1, Some(HandlerId::Rep)),
        EndRep => entry!(None, Some(SM2), Some(SM2), 0, 0, Some(HandlerId::EndRep)),
        If => entry!(None, Some(SM2), Some(SM2), 0, 1, Some(HandlerId::If)),
        Ifc => entry!(None, Some(SM2), Some(SM2), 0, 2, Some(HandlerId::Ifc)),
        Else => entry!(None, Some(SM2), Some(SM2), 0, 0, Some(HandlerId::Else)),
        EndIf => entry!(None, Some(SM2), Some(SM2), 0, 0, Some(HandlerId::EndIf)),
        Break => entry!(None, Some(SM2), Some(SM2), 0, 0, None),
        BreakC => entry!(None, Some(SM2), Some(SM2), 0, 2, Some(HandlerId::BreakC)),
        Mova => entry!(Some(IrOp::Mov), Some(SM2), None, 1, 1, None),
        DefB => entry!(None, Some(ALL), Some(ALL), 1, 1, Some(HandlerId::DefB)),
        DefI => entry!(None, Some(ALL), Some(ALL), 1, 1, Some(HandlerId::DefI)),
        TexCoord => entry!(None, None, Some(SM1_TO_1_3), 1, 0, Some(HandlerId::TexCoordMov)),
        TexKill => entry!(None, None, Some(ALL), 1, 0, Some(HandlerId::TexKill)),
        Tex => entry!(None, None, Some(ALL), 1, 2, Some(HandlerId::Tex)),
        TexBem => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXBEM"))),
        TexBeml => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXBEML"))),
        TexReg2Ar => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXREG2AR"))),
        TexReg2Gb => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXREG2GB"))),
        TexM3x2Pad => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXM3x2PAD"))),
        TexM3x2Tex => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXM3x2TEX"))),
        TexM3x3Pad => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXM3x3PAD"))),
        TexM3x3Tex => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXM3x3TEX"))),
        TexM3x3Spec => entry!(None, None, Some(SM1_TO_1_3), 1, 2, Some(HandlerId::UnimplementedLegacy("TEXM3x3SPEC"))),
        TexM3x3VSpec => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXM3x3VSPEC"))),
        ExpP => entry!(Some(IrOp::Exp), Some(SM1_TO_1_3), None, 1, 1, None),
        LogP => entry!(Some(IrOp::Log), Some(SM1_TO_1_3), None, 1, 1, None),
        Cnd => entry!(Some(IrOp::Cnd), None, Some(SM1_TO_1_3), 1, 3, None),
        Def => entry!(None, Some(ALL), Some(ALL), 1, 1, Some(HandlerId::Def)),
        TexReg2Rgb => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXREG2RGB"))),
        TexDp3Tex => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXDP3TEX"))),
        TexM3x2Depth => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXM3x2DEPTH"))),
        TexDp3 => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXDP3"))),
        TexM3x3 => entry!(None, None, Some(SM1_TO_1_3), 1, 1, Some(HandlerId::UnimplementedLegacy("TEXM3x3"))),
        TexDepth => entry!(None, None, Some(SM14), 1, 0, None),
        Cmp => entry!(Some(IrOp::Cmp), None, Some(ALL), 1, 3, None),
        Bem => entry!(None, None, Some(SM1_TO_1_3), 1, 2, Some(HandlerId::UnimplementedLegacy("BEM"))),
        Dp2Add => entry!(Some(IrOp::Dp2A), None, Some(SM2), 1, 3, None),
        Dsx => entry!(Some(IrOp::Ddx), None, Some(SM2), 1, 1, None),
        Dsy => entry!(Some(IrOp::Ddy), None, Some(SM2), 1, 1, None),
        TexLdd => entry!(None, None, Some(SM2), 1, 4, Some(HandlerId::TexLdd)),
        SetP => entry!(Some(IrOp::Sge), Some(SM2), Some(SM2), 1, 2, None),
        TexLdl => entry!(None, Some(SM3), Some(SM3), 1, 2, Some(HandlerId::TexLdl)),
        BreakP => entry!(None, Some(SM2), Some(SM2), 0, 1, None),
        Phase => entry!(None, None, Some(SM14), 0, 0, Some(HandlerId::Phase)),
        Comment => entry!(None, Some(ALL), Some(ALL), 0, 0, Some(HandlerId::Comment)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_range_is_inclusive() {
        let r = VersionRange::new(2, 0, 3, 0);
        assert!(r.contains(Version { major: 2, minor: 0 }));
        assert!(r.contains(Version { major: 3, minor: 0 }));
        assert!(!r.contains(Version { major: 1, minor: 4 }));
    }

    #[test]
    fn loop_is_vs2_plus_only() {
        let e = lookup(Opcode::Loop);
        assert!(e.vs_range.unwrap().contains(Version { major: 3, minor: 0 }));
        assert!(e.ps_range.is_none() || !e.ps_range.unwrap().contains(Version { major: 1, minor: 1 }));
    }

    #[test]
    fn from_raw_maps_known_opcodes() {
        assert_eq!(Opcode::from_raw(1), Some(Opcode::Mov));
        assert_eq!(Opcode::from_raw(0xFFFE), Some(Opcode::Comment));
        assert_eq!(Opcode::from_raw(9999), None);
    }

    #[test]
    fn legacy_texm3x_family_is_stubbed() {
        let e = lookup(Opcode::TexM3x3);
        assert!(matches!(e.handler, Some(HandlerId::UnimplementedLegacy(_))));
    }
}
