//! Compiler passes.
//!
//! - [`registration`]: Pass 1 - assign addresses and ids to every declaration
//! - [`compilation`]: Pass 2 - emit the globals, enums, functions and main sections

pub mod compilation;
pub mod registration;

pub use compilation::{CompilationOutput, CompilationPass, CompiledFunction};
pub use registration::{
    EnumDef, FunctionBody, FunctionDef, GlobalDef, RegistrationOutput, RegistrationPass,
};
