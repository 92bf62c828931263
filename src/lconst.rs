//! Local Constants: the `DEF`/`DEFI`/`DEFB` literal tables baked into a
//! program, looked up by a plain (non-indirect) constant-register reference
//! in place of the constant-buffer slot it shadows.
//!
//! `lconstf` entries are stored as a sparse, append-only list since the
//! float constant index space is sized to fit the whole constant file and
//! scanning a program rarely declares more than a handful of literals;
//! `lconsti`/`lconstb` are small enough (integer and boolean constant banks
//! are far narrower than the float bank) to index directly.

use smallvec::SmallVec;

pub const NUM_CONST_I: usize = 16;
pub const NUM_CONST_B: usize = 16;

#[derive(Copy, Clone, Debug)]
pub struct FloatConst {
    pub index: u32,
    pub value: [f32; 4],
}

#[derive(Copy, Clone, Debug)]
pub struct IntConst {
    pub index: u32,
    pub value: [i32; 4],
}

#[derive(Copy, Clone, Debug)]
pub struct BoolConst {
    pub index: u32,
    pub value: bool,
}

#[derive(Default)]
pub struct LocalConstants {
    floats: SmallVec<[FloatConst; 8]>,
    ints: [Option<IntConst>; NUM_CONST_I],
    bools: [Option<BoolConst>; NUM_CONST_B],
    /// Set once any constant register (of any file) is addressed relatively;
    /// from that point on, plain lookups here are bypassed in favor of the
    /// real constant buffer so the indirect index always sees every slot.
    indirect_access: bool,
}

impl LocalConstants {
    pub fn new() -> Self {
        LocalConstants {
            floats: SmallVec::new(),
            ints: [None; NUM_CONST_I],
            bools: [None; NUM_CONST_B],
            indirect_access: false,
        }
    }

    pub fn mark_indirect_access(&mut self) {
        self.indirect_access = true;
    }

    pub fn has_indirect_access(&self) -> bool {
        self.indirect_access
    }

    pub fn define_float(&mut self, index: u32, value: [f32; 4]) {
        if let Some(existing) = self.floats.iter_mut().find(|c| c.index == index) {
            existing.value = value;
        } else {
            self.floats.push(FloatConst { index, value });
        }
    }

    pub fn define_int(&mut self, index: u32, value: [i32; 4]) {
        if let Some(slot) = self.ints.get_mut(index as usize) {
            *slot = Some(IntConst { index, value });
        } else {
            log::warn!("integer constant index {} out of range, ignoring DEFI", index);
        }
    }

    pub fn define_bool(&mut self, index: u32, value: bool) {
        if let Some(slot) = self.bools.get_mut(index as usize) {
            *slot = Some(BoolConst { index, value });
        } else {
            log::warn!("boolean constant index {} out of range, ignoring DEFB", index);
        }
    }

    /// Looks up a literal for a plain (non-relative) constant reference.
    /// Returns `None` once indirect addressing is in play anywhere in the
    /// program, even for this exact index, so that every constant of that
    /// file resolves consistently through the real constant buffer.
    pub fn lookup_float(&self, index: u32) -> Option<[f32; 4]> {
        if self.indirect_access {
            return None;
        }
        self.floats.iter().find(|c| c.index == index).map(|c| c.value)
    }

    pub fn lookup_int(&self, index: u32) -> Option<[i32; 4]> {
        if self.indirect_access {
            return None;
        }
        self.ints.get(index as usize).and_then(|c| c.map(|c| c.value))
    }

    pub fn lookup_bool(&self, index: u32) -> Option<bool> {
        if self.indirect_access {
            return None;
        }
        self.bools.get(index as usize).and_then(|c| c.map(|c| c.value))
    }

    pub fn float_consts(&self) -> impl Iterator<Item = &FloatConst> {
        self.floats.iter()
    }

    pub fn int_consts(&self) -> impl Iterator<Item = &IntConst> {
        self.ints.iter().filter_map(|c| c.as_ref())
    }

    pub fn bool_consts(&self) -> impl Iterator<Item = &BoolConst> {
        self.bools.iter().filter_map(|c| c.as_ref())
    }
}
