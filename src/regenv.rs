//! Register Environment: lazily declares every register a program touches
//! and remembers the resulting IR handle so a second reference to the same
//! register is a cache hit rather than a second declaration.
//!
//! The bytecode format never declares a temporary, address, or predicate
//! register up front, it just uses one, so the first use in program order is
//! the declaration site. Every cache here is a plain "have we seen this
//! index before" check; the caller still does the actual allocation through
//! its `ShaderEnvironment` and stores the result back here only on a miss.

use std::collections::HashMap;

use crate::ids::{SamplerId, TempId};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TextureKind {
    OneD,
    TwoD,
    ThreeD,
    Cube,
}

#[derive(Default)]
pub struct RegisterEnvironment {
    temps: HashMap<u32, TempId>,
    address: Option<TempId>,
    predicate: Option<TempId>,
    outputs: HashMap<u32, TempId>,
    inputs: HashMap<u32, TempId>,
    fs_color_inputs: [Option<TempId>; 2],
    fs_texcoord_inputs: [Option<TempId>; 8],
    samplers: HashMap<u32, (SamplerId, TextureKind)>,
}

impl RegisterEnvironment {
    pub fn new() -> Self {
        RegisterEnvironment::default()
    }

    pub fn temp(&mut self, idx: u32) -> Option<TempId> {
        self.temps.get(&idx).copied()
    }

    pub fn insert_temp(&mut self, idx: u32, id: TempId) {
        self.temps.insert(idx, id);
    }

    pub fn address(&self) -> Option<TempId> {
        self.address
    }

    pub fn set_address(&mut self, id: TempId) {
        self.address = Some(id);
    }

    pub fn predicate(&self) -> Option<TempId> {
        self.predicate
    }

    pub fn set_predicate(&mut self, id: TempId) {
        self.predicate = Some(id);
    }

    pub fn output(&mut self, idx: u32) -> Option<TempId> {
        self.outputs.get(&idx).copied()
    }

    pub fn insert_output(&mut self, idx: u32, id: TempId) {
        self.outputs.insert(idx, id);
    }

    pub fn input(&mut self, idx: u32) -> Option<TempId> {
        self.inputs.get(&idx).copied()
    }

    pub fn insert_input(&mut self, idx: u32, id: TempId) {
        self.inputs.insert(idx, id);
    }

    pub fn fs_color_input(&self, idx: u32) -> Option<TempId> {
        self.fs_color_inputs[idx as usize]
    }

    pub fn set_fs_color_input(&mut self, idx: u32, id: TempId) {
        self.fs_color_inputs[idx as usize] = Some(id);
    }

    pub fn fs_texcoord_input(&self, idx: u32) -> Option<TempId> {
        self.fs_texcoord_inputs[idx as usize]
    }

    pub fn set_fs_texcoord_input(&mut self, idx: u32, id: TempId) {
        self.fs_texcoord_inputs[idx as usize] = Some(id);
    }

    pub fn sampler(&self, idx: u32) -> Option<(SamplerId, TextureKind)> {
        self.samplers.get(&idx).copied()
    }

    /// Records sampler `idx`'s handle and texture kind, whether it came from
    /// an explicit `DCL` or was defaulted to `TextureKind::TwoD` by the
    /// caller on first use without one.
    pub fn insert_sampler(&mut self, idx: u32, id: SamplerId, kind: TextureKind) {
        self.samplers.insert(idx, (id, kind));
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use cranelift_entity::EntityRef;

    #[test]
    fn temp_is_declared_once() {
        let mut env = RegisterEnvironment::new();
        assert_eq!(env.temp(3), None);
        env.insert_temp(3, TempId::new(0));
        assert_eq!(env.temp(3), Some(TempId::new(0)));
        assert_eq!(env.temp(3), Some(TempId::new(0)));
    }

    #[test]
    fn address_register_is_singleton() {
        let mut env = RegisterEnvironment::new();
        assert_eq!(env.address(), None);
        env.set_address(TempId::new(7));
        assert_eq!(env.address(), Some(TempId::new(7)));
    }

    #[test]
    fn distinct_temp_indices_cache_independently() {
        let mut env = RegisterEnvironment::new();
        env.insert_temp(0, TempId::new(0));
        env.insert_temp(1, TempId::new(1));
        assert_ne!(env.temp(0), env.temp(1));
    }

    #[test]
    fn sampler_without_dcl_defaults_to_2d() {
        let mut env = RegisterEnvironment::new();
        assert_eq!(env.sampler(5), None);
        env.insert_sampler(5, SamplerId::new(0), TextureKind::TwoD);
        assert_eq!(env.sampler(5).unwrap().1, TextureKind::TwoD);
    }
}
