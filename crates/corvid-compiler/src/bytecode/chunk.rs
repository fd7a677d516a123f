//! A resolved run of instructions.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use super::{Instruction, OpCode};

/// Instructions for one body (a function or the ordinary stream) with every
/// jump target resolved.
///
/// Jump targets are instruction indices counted from the first instruction
/// of the chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytecodeChunk {
    instructions: Vec<Instruction>,
}

impl BytecodeChunk {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Net stack effect of running every instruction in order, ignoring
    /// jumps.
    pub fn stack_effect(&self) -> i64 {
        self.instructions.iter().map(Instruction::stack_effect).sum()
    }

    /// Stack depths with which execution can run past the last instruction,
    /// following both arms of every `JUMP_IF`.
    ///
    /// Paths ending in `RETURN` are not counted. A well-formed expression
    /// yields `{1}` and a well-formed statement `{0}`.
    pub fn end_depths(&self) -> BTreeSet<i64> {
        let limit = (self.instructions.len() + 1) * 64;
        let mut ends = BTreeSet::new();
        let mut seen = FxHashSet::default();
        let mut work = vec![(0usize, 0i64)];

        while let Some((pc, depth)) = work.pop() {
            if !seen.insert((pc, depth)) {
                continue;
            }
            let Some(inst) = self.instructions.get(pc) else {
                ends.insert(depth);
                continue;
            };
            let after = depth + inst.stack_effect();
            match inst.op() {
                OpCode::Return => {}
                OpCode::Jump => {
                    if let Some(target) = inst.jump_target() {
                        work.push((target as usize, after));
                    }
                }
                OpCode::JumpIf => {
                    if let Some(target) = inst.jump_target() {
                        work.push((target as usize, after));
                    }
                    work.push((pc + 1, after));
                }
                _ => work.push((pc + 1, after)),
            }
            // a loop that grows the stack never revisits a state
            if seen.len() > limit {
                break;
            }
        }
        ends
    }

    /// Extract all opcodes from this chunk.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.instructions.iter().map(Instruction::op).collect()
    }

    /// Assert that this chunk contains exactly the given opcodes in order.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }

    /// Index of the first instruction with this opcode at or after `from`.
    pub fn position(&self, op: OpCode, from: usize) -> Option<usize> {
        self.instructions
            .iter()
            .skip(from)
            .position(|inst| inst.op() == op)
            .map(|i| i + from)
    }
}
