//! Translation state: the control-flow stacks threaded through a single
//! program's decode-dispatch-emit loop.
//!
//! Shaped after a generic structured-control-flow translator's control
//! stack: one frame per open `LOOP`/`REP`/`IF` region, popped by its matching
//! `ENDLOOP`/`ENDREP`/`ENDIF`. Unlike a block-structured IR translator we
//! never merge values at frame exit (this bytecode has no block arguments),
//! so a frame only needs to remember enough to close itself correctly:
//! which label identifies the loop back-edge, and — for `LOOP`/`REP` — which
//! four-lane group of the packed loop-counter register it claimed.

use crate::ids::{LabelId, TempId};
use crate::param::SourceParam;

pub const MAX_LOOP_DEPTH: u32 = 64;
pub const MAX_COND_DEPTH: u32 = 64;

/// One claimed lane of the packed loop-counter register: up to four nested
/// loops share a single temporary, one writemask component each.
#[derive(Copy, Clone, Debug)]
pub struct LoopCounterLane {
    pub register: TempId,
    pub lane: u8,
}

#[derive(Clone, Debug)]
pub enum ControlFrame {
    Loop {
        end_label: LabelId,
        counter: LoopCounterLane,
        /// The per-iteration increment, carried from `LOOP`/`REP` entry to
        /// the matching `ENDLOOP`/`ENDREP` where the counter advances.
        step: SourceParam,
    },
    Rep {
        end_label: LabelId,
        counter: LoopCounterLane,
        step: SourceParam,
    },
    If {
        cond_label: LabelId,
        has_else: bool,
    },
}

/// Tracks the nesting of `LOOP`/`REP`/`IF` regions and the group of four
/// loop-counter lanes currently in use.
#[derive(Default)]
pub struct TranslationState {
    control_stack: Vec<ControlFrame>,
    loop_depth: u32,
    loop_counter_group: Option<TempId>,
}

impl TranslationState {
    pub fn new() -> Self {
        TranslationState::default()
    }

    pub fn loop_depth(&self) -> u32 {
        self.loop_depth
    }

    /// Enters a `LOOP`/`REP` region, claiming the next lane of the current
    /// four-lane loop-counter group (allocating a fresh group every four
    /// levels of nesting, mirroring the packed-register layout).
    pub fn push_loop(
        &mut self,
        end_label: LabelId,
        step: SourceParam,
        allocate_group: impl FnOnce() -> TempId,
    ) -> TranslateResult<LoopCounterLane> {
        if self.loop_depth >= MAX_LOOP_DEPTH {
            return Err(crate::error::TranslateError::OutOfMemory(
                "loop nesting exceeds the maximum supported depth",
            ));
        }
        let lane_in_group = (self.loop_depth % 4) as u8;
        if lane_in_group == 0 {
            self.loop_counter_group = Some(allocate_group());
        }
        let register = self
            .loop_counter_group
            .expect("loop counter group allocated at lane 0");
        self.loop_depth += 1;
        let counter = LoopCounterLane {
            register,
            lane: lane_in_group,
        };
        self.control_stack.push(ControlFrame::Loop { end_label, counter, step });
        Ok(counter)
    }

    pub fn push_rep(
        &mut self,
        end_label: LabelId,
        step: SourceParam,
        allocate_group: impl FnOnce() -> TempId,
    ) -> TranslateResult<LoopCounterLane> {
        // REP shares the loop-counter allocator with LOOP: both consume one
        // lane of packed counter state per nesting level.
        let lane = self.push_loop(end_label, step, allocate_group)?;
        if let Some(ControlFrame::Loop { end_label, counter, step }) = self.control_stack.pop() {
            self.control_stack.push(ControlFrame::Rep { end_label, counter, step });
        }
        Ok(lane)
    }

    /// Pops the innermost loop/rep frame. Returns `None` if the stack top is
    /// not a loop frame (an `ENDLOOP`/`ENDREP` with no matching opener).
    pub fn pop_loop(&mut self) -> Option<(LabelId, LoopCounterLane, SourceParam)> {
        match self.control_stack.pop() {
            Some(ControlFrame::Loop { end_label, counter, step })
            | Some(ControlFrame::Rep { end_label, counter, step }) => {
                self.loop_depth -= 1;
                if self.loop_depth % 4 == 0 {
                    self.loop_counter_group = None;
                }
                Some((end_label, counter, step))
            }
            Some(other) => {
                self.control_stack.push(other);
                None
            }
            None => None,
        }
    }

    pub fn push_if(&mut self, cond_label: LabelId) -> TranslateResult<()> {
        if self.cond_depth() >= MAX_COND_DEPTH {
            return Err(crate::error::TranslateError::OutOfMemory(
                "conditional nesting exceeds the maximum supported depth",
            ));
        }
        self.control_stack.push(ControlFrame::If {
            cond_label,
            has_else: false,
        });
        Ok(())
    }

    /// Marks the innermost `IF` frame as having seen its `ELSE`.
    pub fn mark_else(&mut self) -> bool {
        if let Some(ControlFrame::If { has_else, .. }) = self.control_stack.last_mut() {
            *has_else = true;
            true
        } else {
            false
        }
    }

    pub fn pop_if(&mut self) -> Option<LabelId> {
        match self.control_stack.pop() {
            Some(ControlFrame::If { cond_label, .. }) => Some(cond_label),
            Some(other) => {
                self.control_stack.push(other);
                None
            }
            None => None,
        }
    }

    fn cond_depth(&self) -> u32 {
        self.control_stack
            .iter()
            .filter(|f| matches!(f, ControlFrame::If { .. }))
            .count() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.control_stack.is_empty()
    }

    pub fn innermost(&self) -> Option<&ControlFrame> {
        self.control_stack.last()
    }
}

use crate::error::TranslateResult;
