//! Loop bookkeeping for break/continue.
//!
//! Each active loop records where `continue` re-enters, where `break`
//! joins the exit check, the increment a `for` loop re-runs before
//! continuing, and the locals that were live when the loop began.

use corvid_core::ast::Stmt;

use super::Label;

/// Jump targets of one active loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopBounds<'ast> {
    /// Start of the condition re-check; `continue` jumps here.
    pub condition: Label,
    /// The loop's exit `JUMP_IF`; `break` pushes `true` and jumps here.
    pub exit_check: Label,
    /// `for` increment re-emitted by `continue`.
    pub increment: Option<&'ast Stmt<'ast>>,
    /// Live local slots when the loop was entered.
    pub slot_base: u32,
    /// Local scope depth when the loop was entered.
    pub scope_depth: u32,
}

/// Stack of active loops, innermost last.
#[derive(Debug, Default)]
pub struct JumpManager<'ast> {
    loops: Vec<LoopBounds<'ast>>,
}

impl<'ast> JumpManager<'ast> {
    pub fn new() -> Self {
        Self { loops: Vec::new() }
    }

    pub fn enter_loop(&mut self, bounds: LoopBounds<'ast>) {
        self.loops.push(bounds);
    }

    pub fn exit_loop(&mut self) -> Option<LoopBounds<'ast>> {
        self.loops.pop()
    }

    /// The innermost active loop.
    pub fn current(&self) -> Option<&LoopBounds<'ast>> {
        self.loops.last()
    }

    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }
}
