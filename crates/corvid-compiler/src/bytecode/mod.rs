//! Bytecode types for the Corvid compiler.
//!
//! This module contains the instruction encoding:
//!
//! - [`OpCode`] - The instruction set for the VM
//! - [`TypeTag`] - Datatype tags carried in operands
//! - [`Instruction`] - One framed instruction and its codec
//! - [`BytecodeChunk`] - Resolved instructions for one body
//! - [`Program`] - The bytecode file: header plus instruction stream

mod chunk;
mod instruction;
mod opcode;
pub mod program;
mod type_tag;

pub use chunk::BytecodeChunk;
pub use instruction::{Instruction, Operand, OperandKind, TERMINATOR, write_text};
pub use opcode::OpCode;
pub use program::{FORMAT_VERSION, HEADER_LEN, MAGIC, Program};
pub use type_tag::{ENUM_TAG_CODE, TypeTag};
