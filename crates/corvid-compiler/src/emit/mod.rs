//! Bytecode emitter for the Corvid compiler.
//!
//! The [`BytecodeEmitter`] appends instructions for one body and handles
//! jumps through labels: a [`Label`] is created before its position is
//! known, jumps refer to it freely, and [`bind`](BytecodeEmitter::bind)
//! later fixes it to the index of the next instruction. Targets are written
//! into jump operands only in [`finish`](BytecodeEmitter::finish), so no
//! instruction is ever inserted or moved.
//!
//! # Example
//!
//! ```
//! use corvid_compiler::bytecode::OpCode;
//! use corvid_compiler::emit::BytecodeEmitter;
//!
//! let mut emitter = BytecodeEmitter::new();
//! let end = emitter.new_label();
//! emitter.emit_bool(true);
//! emitter.emit_jump(OpCode::JumpIf, end);
//! emitter.emit_int(1);
//! emitter.bind(end).unwrap();
//! emitter.emit_int(2);
//!
//! let chunk = emitter.finish().unwrap();
//! assert_eq!(chunk.get(1).unwrap().jump_target(), Some(3));
//! ```

mod jumps;

pub use jumps::{JumpManager, LoopBounds};

use corvid_core::{CompilationError, EncodingError};
use tracing::trace;

use crate::bytecode::{BytecodeChunk, Instruction, OpCode, TypeTag, write_text};
use crate::ids::{EnumId, FunctionId};

/// A position in the body being emitted, resolved when bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub(crate) u32);

impl Label {
    pub fn index(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
enum Pending {
    Ready(Instruction),
    Jump { op: OpCode, target: Label },
}

/// Emits the instructions of a single body.
#[derive(Debug, Default)]
pub struct BytecodeEmitter {
    code: Vec<Pending>,
    /// Bound instruction index per label
    labels: Vec<Option<u32>>,
}

impl BytecodeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Append a fully built instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.code.push(Pending::Ready(instruction));
    }

    /// Emit a single opcode with no operands.
    pub fn emit(&mut self, op: OpCode) {
        self.push(Instruction::bare(op));
    }

    /// Emit opcode with one u32 operand.
    pub fn emit_u32(&mut self, op: OpCode, value: u32) {
        self.push(Instruction::from_parts(op, value.to_be_bytes().to_vec()));
    }

    fn emit_u32_pair(&mut self, op: OpCode, a: u32, b: u32) {
        let mut payload = Vec::with_capacity(8);
        payload.extend_from_slice(&a.to_be_bytes());
        payload.extend_from_slice(&b.to_be_bytes());
        self.push(Instruction::from_parts(op, payload));
    }

    // ==========================================================================
    // Literals
    // ==========================================================================

    pub fn emit_bool(&mut self, value: bool) {
        self.push(Instruction::from_parts(
            OpCode::PushBool,
            i32::from(value).to_be_bytes().to_vec(),
        ));
    }

    /// Chars are pushed as their code point. Chars outside Latin-1 are
    /// rejected so that every char fits a text byte.
    pub fn emit_char(&mut self, value: char) -> Result<(), EncodingError> {
        let code = u32::from(value);
        if code > 0xFF {
            return Err(EncodingError::UnrepresentableChar { ch: value });
        }
        self.push(Instruction::from_parts(
            OpCode::PushChar,
            (code as i32).to_be_bytes().to_vec(),
        ));
        Ok(())
    }

    pub fn emit_int(&mut self, value: i32) {
        self.push(Instruction::from_parts(
            OpCode::PushInt,
            value.to_be_bytes().to_vec(),
        ));
    }

    pub fn emit_long(&mut self, value: i64) {
        self.push(Instruction::from_parts(
            OpCode::PushLong,
            value.to_be_bytes().to_vec(),
        ));
    }

    pub fn emit_float(&mut self, value: f32) {
        self.push(Instruction::from_parts(
            OpCode::PushFloat,
            value.to_be_bytes().to_vec(),
        ));
    }

    pub fn emit_double(&mut self, value: f64) {
        self.push(Instruction::from_parts(
            OpCode::PushDouble,
            value.to_be_bytes().to_vec(),
        ));
    }

    pub fn emit_string(&mut self, value: &str) -> Result<(), EncodingError> {
        let mut payload = Vec::with_capacity(4 + value.len());
        write_text(value, &mut payload)?;
        self.push(Instruction::from_parts(OpCode::PushString, payload));
        Ok(())
    }

    pub fn emit_null(&mut self) {
        self.emit(OpCode::PushNull);
    }

    /// Push the default value of a type.
    pub fn emit_default(&mut self, tag: TypeTag) {
        let mut payload = Vec::with_capacity(tag.encoded_len());
        tag.write(&mut payload);
        self.push(Instruction::from_parts(OpCode::PushDefault, payload));
    }

    pub fn emit_enum_member(&mut self, id: EnumId, ordinal: u32) {
        self.emit_u32_pair(OpCode::PushEnumMember, id.index(), ordinal);
    }

    // ==========================================================================
    // Storage
    // ==========================================================================

    pub fn emit_address(&mut self, address: u32) {
        self.emit_u32(OpCode::PushAddress, address);
    }

    /// Emit `POP count`, or nothing when `count` is zero.
    pub fn emit_pop(&mut self, count: u32) {
        if count > 0 {
            self.emit_u32(OpCode::Pop, count);
        }
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    pub fn emit_call(&mut self, function: FunctionId, arg_count: u32) {
        self.emit_u32_pair(OpCode::Call, function.index(), arg_count);
    }

    pub fn emit_return(&mut self) {
        self.emit(OpCode::Return);
    }

    /// `PUSH_NULL; RETURN`, for functions that return no value.
    pub fn emit_return_void(&mut self) {
        self.emit_null();
        self.emit_return();
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// `DECLARE_GLOBAL` / `DEFINE_GLOBAL`.
    pub fn emit_global(&mut self, op: OpCode, address: u32, tag: TypeTag) {
        debug_assert!(matches!(op, OpCode::DeclareGlobal | OpCode::DefineGlobal));
        let mut payload = Vec::with_capacity(4 + tag.encoded_len());
        payload.extend_from_slice(&address.to_be_bytes());
        tag.write(&mut payload);
        self.push(Instruction::from_parts(op, payload));
    }

    /// `ENUM_BEGIN` / `ENUM_MEMBER`: a number followed by a name.
    pub fn emit_named(&mut self, op: OpCode, number: u32, name: &str) -> Result<(), EncodingError> {
        debug_assert!(matches!(op, OpCode::EnumBegin | OpCode::EnumMember));
        let mut payload = Vec::with_capacity(8 + name.len());
        payload.extend_from_slice(&number.to_be_bytes());
        write_text(name, &mut payload)?;
        self.push(Instruction::from_parts(op, payload));
        Ok(())
    }

    pub fn emit_native(&mut self, descriptor: &str) -> Result<(), EncodingError> {
        let mut payload = Vec::with_capacity(4 + descriptor.len());
        write_text(descriptor, &mut payload)?;
        self.push(Instruction::from_parts(OpCode::Native, payload));
        Ok(())
    }

    // ==========================================================================
    // Labels and Jumps
    // ==========================================================================

    /// Create an unbound label.
    pub fn new_label(&mut self) -> Label {
        let label = Label(self.labels.len() as u32);
        self.labels.push(None);
        label
    }

    /// Bind a label to the position of the next emitted instruction.
    pub fn bind(&mut self, label: Label) -> Result<(), CompilationError> {
        let here = self.code.len() as u32;
        let Some(slot) = self.labels.get_mut(label.0 as usize) else {
            return Err(CompilationError::internal(format!(
                "label {} was not created by this emitter",
                label.0
            )));
        };
        if slot.is_some() {
            return Err(CompilationError::internal(format!(
                "label {} bound twice",
                label.0
            )));
        }
        *slot = Some(here);
        Ok(())
    }

    /// Emit `JUMP` or `JUMP_IF` to a label that may not be bound yet.
    pub fn emit_jump(&mut self, op: OpCode, target: Label) {
        debug_assert!(op.is_jump(), "{op:?} is not a jump");
        self.code.push(Pending::Jump { op, target });
    }

    /// Number of instructions emitted so far.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Resolve every jump and return the finished chunk.
    ///
    /// Jumping to a label that was never bound is an internal error.
    pub fn finish(self) -> Result<BytecodeChunk, CompilationError> {
        let Self { code, labels } = self;
        let mut resolved = 0usize;
        let instructions = code
            .into_iter()
            .map(|pending| match pending {
                Pending::Ready(inst) => Ok(inst),
                Pending::Jump { op, target } => {
                    let index = labels
                        .get(target.0 as usize)
                        .copied()
                        .flatten()
                        .ok_or_else(|| {
                            CompilationError::internal(format!(
                                "jump to unbound label {}",
                                target.0
                            ))
                        })?;
                    resolved += 1;
                    Ok(Instruction::from_parts(op, index.to_be_bytes().to_vec()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        trace!(
            target: "corvid::compiler::emit",
            instructions = instructions.len(),
            labels = labels.len(),
            jumps = resolved,
            "resolved chunk"
        );
        Ok(BytecodeChunk::new(instructions))
    }
}
