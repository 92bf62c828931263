//! Small entity-reference newtypes, in the style of `cranelift_entity`'s
//! `FuncIndex`/`TableIndex` family: cheap `Copy` indices that double as keys
//! into `PrimaryMap`/`SecondaryMap` without the register environment having to
//! hand out raw `u32`s everywhere.

use cranelift_entity::entity_impl;

/// A temporary register index (`r#`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TempId(u32);
entity_impl!(TempId, "temp");

/// A branch target, recorded by `LABEL` and resolved by `CALL`/`CALLNZ`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(u32);
entity_impl!(LabelId, "label");

/// A sampler slot, declared by `DCL` and consulted by the `TEX` family.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SamplerId(u32);
entity_impl!(SamplerId, "sampler");
