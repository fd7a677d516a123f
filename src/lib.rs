//! Corvid bytecode back end.
//!
//! Turns a type-checked Corvid tree into the Corvid bytecode file format.
//!
//! - [`core`]: spans, data types, errors and the typed tree
//! - [`compiler`]: the two-pass compiler and the bytecode codec
//!
//! ```ignore
//! use corvid::prelude::*;
//!
//! let bytes = compile(&script, "", "main")?;
//! let program = Program::parse(&bytes)?;
//! println!("{}", program.disassemble());
//! ```

pub use corvid_compiler as compiler;
pub use corvid_core as core;

pub use corvid_compiler::{CompileOptions, Compiler, Program, compile, compile_with};
pub use corvid_core::{CompilationError, CorvidError, EncodingError};

// Re-export main types
pub mod prelude {
    pub use corvid_compiler::bytecode::{Instruction, OpCode, Operand, Program, TypeTag};
    pub use corvid_compiler::{CompileOptions, Compiler, compile, compile_with};
    pub use corvid_core::ast::*;
    pub use corvid_core::{CompilationError, CorvidError, DataType, EncodingError, Span};
}
