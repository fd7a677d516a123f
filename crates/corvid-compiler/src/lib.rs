//! Corvid Compiler
//!
//! A 2-pass back end turning a typed Corvid tree into the Corvid bytecode
//! file format.
//!
//! ## Architecture
//!
//! - **Pass 1 (Registration)**: Assign addresses and ids to every global, enum and function
//! - **Pass 2 (Compilation)**: Emit each section and resolve jump labels
//!
//! ## Modules
//!
//! - [`bytecode`]: Opcodes, type tags, instruction framing and the program file
//! - [`context`]: Compilation context with module-aware name qualification
//! - [`emit`]: Label-resolving bytecode emitter
//! - [`expr`]: Expression compiler
//! - [`function_compiler`]: Per-body compilation
//! - [`ids`]: Numeric ids for globals, locals, enums and functions
//! - [`passes`]: The registration and compilation passes
//! - [`stmt`]: Statement compiler for control flow and declarations
//! - [`symbols`]: Global, enum, function and local tables

pub mod bytecode;
pub mod context;
pub mod emit;
pub mod expr;
pub mod function_compiler;
pub mod ids;
pub mod passes;
pub mod stmt;
pub mod symbols;

pub use bytecode::{BytecodeChunk, FORMAT_VERSION, Instruction, OpCode, Operand, Program, TypeTag};
pub use context::{CompilationContext, qualify};
pub use emit::{BytecodeEmitter, Label};
pub use expr::ExprCompiler;
pub use function_compiler::FunctionCompiler;
pub use ids::{EnumId, FunctionId, GlobalAddress, LocalSlot};
pub use passes::{CompilationOutput, CompilationPass, RegistrationOutput, RegistrationPass};
pub use stmt::StmtCompiler;
pub use symbols::{SymbolTables, VarLookup};

// Re-export the error types from core for convenience
pub use corvid_core::{CompilationError, EncodingError};

use corvid_core::ast::Script;
use tracing::debug;

type Result<T> = std::result::Result<T, CompilationError>;

/// Options for a whole-program compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Module path of the entry function; empty for the top level.
    pub entry_module: String,
    /// Unqualified name of the entry function.
    pub entry_function: String,
    /// Format version written to the header.
    pub version: u8,
}

impl CompileOptions {
    pub fn new(entry_module: impl Into<String>, entry_function: impl Into<String>) -> Self {
        Self {
            entry_module: entry_module.into(),
            entry_function: entry_function.into(),
            version: FORMAT_VERSION,
        }
    }

    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// The qualified name searched for as the entry point.
    pub fn entry_name(&self) -> String {
        qualify(&self.entry_module, &self.entry_function)
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new("", "main")
    }
}

/// The main compiler entry point.
///
/// Whole-program compilation always starts from empty tables. The REPL entry
/// point [`Compiler::emit_to_buffer`] instead keeps its tables between calls,
/// so later buffers can use what earlier ones declared.
#[derive(Debug, Default)]
pub struct Compiler {
    ctx: CompilationContext,
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            ctx: CompilationContext::new(),
            options,
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Tables accumulated by [`Compiler::emit_to_buffer`].
    pub fn tables(&self) -> &SymbolTables {
        self.ctx.tables()
    }

    /// Compile a whole script into a program ending with its `ENTRY` marker.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_program(&self, script: &Script<'_>) -> Result<Program> {
        let mut ctx = CompilationContext::new();
        let mut instructions = emit_script(&mut ctx, script)?;

        let entry_name = self.options.entry_name();
        let entry = ctx
            .tables()
            .functions
            .find_entry_point(&entry_name)
            .ok_or(CompilationError::MissingEntryPoint { name: entry_name })?;
        instructions.push(Instruction::from_parts(
            OpCode::Entry,
            entry.index().to_be_bytes().to_vec(),
        ));

        debug!(
            target: "corvid::compiler",
            instructions = instructions.len(),
            entry = %entry,
            "program compiled"
        );
        Ok(Program {
            version: self.options.version,
            instructions,
        })
    }

    /// Compile one buffer against the tables built so far.
    ///
    /// Returns the raw instructions without header or entry marker. When the
    /// buffer fails to compile the tables are restored to their state before
    /// the call.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit_to_buffer(&mut self, script: &Script<'_>) -> Result<Vec<Instruction>> {
        let snapshot = self.ctx.clone();
        match emit_script(&mut self.ctx, script) {
            Ok(instructions) => Ok(instructions),
            Err(err) => {
                debug!(target: "corvid::compiler", error = %err, "buffer rejected, rolling back");
                self.ctx = snapshot;
                Err(err)
            }
        }
    }
}

/// Run both passes and concatenate the sections.
fn emit_script(ctx: &mut CompilationContext, script: &Script<'_>) -> Result<Vec<Instruction>> {
    let registration = RegistrationPass::new(ctx).run(script)?;
    let output = CompilationPass::new(ctx).run(&registration)?;
    Ok(output.into_instructions())
}

/// Compile a script to bytes, entering at `entry_module::entry_function`.
pub fn compile(script: &Script<'_>, entry_module: &str, entry_function: &str) -> Result<Vec<u8>> {
    compile_with(script, &CompileOptions::new(entry_module, entry_function))
}

/// Compile a script to bytes with explicit options.
pub fn compile_with(script: &Script<'_>, options: &CompileOptions) -> Result<Vec<u8>> {
    let program = Compiler::new(options.clone()).compile_program(script)?;
    Ok(program.to_bytes())
}
