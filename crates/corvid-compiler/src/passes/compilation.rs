//! Compilation Pass (Pass 2) - emit every section of the program.
//!
//! This pass runs after registration, when every address and id is known.
//! Each section gets its own emitter, so jump targets count from the first
//! instruction of the section (or of a function body):
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ globals    DECLARE_GLOBAL / init DEFINE_GLOBAL │
//! │ enums      ENUM_BEGIN  ENUM_MEMBER*  ENUM_END  │
//! │ functions  FUNCTION_BEGIN  body  FUNCTION_END  │
//! │ main       top-level statements                │
//! └──────────────────────────────────────────────┘
//! ```

use corvid_core::ast::FunctionDecl;
use corvid_core::{CompilationError, EncodingError};
use tracing::{debug, trace};

use crate::bytecode::{BytecodeChunk, Instruction, OpCode, Operand};
use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;
use crate::expr::{ExprCompiler, encoding_error};
use crate::function_compiler::FunctionCompiler;
use crate::ids::FunctionId;
use crate::passes::registration::{EnumDef, FunctionBody, FunctionDef, RegistrationOutput};

type Result<T> = std::result::Result<T, CompilationError>;

/// A compiled function with its bytecode.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    pub id: FunctionId,
    /// Qualified name (for debugging).
    pub name: String,
    /// The `FUNCTION_BEGIN` marker.
    pub begin: Instruction,
    /// Body instructions, or the single `NATIVE` descriptor.
    pub body: BytecodeChunk,
}

/// Output from the compilation pass.
#[derive(Debug, Clone, Default)]
pub struct CompilationOutput {
    pub globals: BytecodeChunk,
    pub enums: BytecodeChunk,
    pub functions: Vec<CompiledFunction>,
    /// The ordinary instruction stream.
    pub main: BytecodeChunk,
}

impl CompilationOutput {
    /// Concatenate every section in file order.
    pub fn into_instructions(self) -> Vec<Instruction> {
        let mut out = self.globals.into_instructions();
        out.extend(self.enums.into_instructions());
        for function in self.functions {
            out.push(function.begin);
            out.extend(function.body.into_instructions());
            out.push(Instruction::bare(OpCode::FunctionEnd));
        }
        out.extend(self.main.into_instructions());
        out
    }
}

/// Pass 2: compile a registered script.
pub struct CompilationPass<'a> {
    ctx: &'a mut CompilationContext,
}

impl<'a> CompilationPass<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    /// Run the compilation pass over everything registration found.
    pub fn run(mut self, registration: &RegistrationOutput<'_>) -> Result<CompilationOutput> {
        let globals = self.compile_globals(registration)?;
        let enums = self.compile_enums(registration)?;
        let functions = registration
            .functions
            .iter()
            .map(|def| self.compile_function(def))
            .collect::<Result<Vec<_>>>()?;
        let main = self.compile_main(registration)?;

        debug!(
            target: "corvid::compiler::passes",
            globals = globals.len(),
            enums = enums.len(),
            functions = functions.len(),
            main = main.len(),
            "compilation complete"
        );
        Ok(CompilationOutput {
            globals,
            enums,
            functions,
            main,
        })
    }

    /// `DECLARE_GLOBAL`, or the initializer followed by `DEFINE_GLOBAL`.
    fn compile_globals(&mut self, registration: &RegistrationOutput<'_>) -> Result<BytecodeChunk> {
        let mut emitter = BytecodeEmitter::new();
        for global in &registration.globals {
            let decl = global.decl;
            let tag = self.ctx.tables().type_tag(&decl.ty, decl.span)?;
            match decl.init {
                Some(init) => {
                    ExprCompiler::new(self.ctx, &mut emitter).compile(init)?;
                    emitter.emit_global(OpCode::DefineGlobal, global.address.index(), tag);
                }
                None => emitter.emit_global(OpCode::DeclareGlobal, global.address.index(), tag),
            }
        }
        emitter.finish()
    }

    /// One `ENUM_BEGIN` / `ENUM_MEMBER`* / `ENUM_END` block per enum.
    fn compile_enums(&mut self, registration: &RegistrationOutput<'_>) -> Result<BytecodeChunk> {
        let mut emitter = BytecodeEmitter::new();
        for def in &registration.enums {
            emit_enum(&mut emitter, def).map_err(encoding_error(def.decl.span))?;
        }
        emitter.finish()
    }

    fn compile_function(&mut self, def: &FunctionDef<'_>) -> Result<CompiledFunction> {
        trace!(
            target: "corvid::compiler::passes",
            id = %def.id,
            name = %def.name,
            "compiling function"
        );
        let begin = Instruction::new(
            OpCode::FunctionBegin,
            &[
                Operand::U32(def.id.index()),
                Operand::Text(def.name.clone()),
                Operand::TagList(def.params.clone()),
            ],
        )
        .map_err(encoding_error(def.body.span()))?;

        let body = match def.body {
            FunctionBody::Script(decl) => {
                let previous = self.ctx.tables_mut().begin_frame();
                let result = compile_script_body(self.ctx, decl);
                self.ctx.tables_mut().end_frame(previous);
                result?
            }
            FunctionBody::Native(decl) => {
                let mut emitter = BytecodeEmitter::new();
                emitter
                    .emit_native(decl.descriptor)
                    .map_err(encoding_error(decl.span))?;
                emitter.finish()?
            }
        };

        Ok(CompiledFunction {
            id: def.id,
            name: def.name.clone(),
            begin,
            body,
        })
    }

    /// Top-level statements, in one frame of their own.
    fn compile_main(&mut self, registration: &RegistrationOutput<'_>) -> Result<BytecodeChunk> {
        let previous = self.ctx.tables_mut().begin_frame();
        let mut compiler = FunctionCompiler::new(self.ctx);
        let result = compiler
            .compile_statements(&registration.statements)
            .and_then(|()| compiler.finish_stream());
        self.ctx.tables_mut().end_frame(previous);
        result
    }
}

fn emit_enum(
    emitter: &mut BytecodeEmitter,
    def: &EnumDef<'_>,
) -> std::result::Result<(), EncodingError> {
    emitter.emit_named(OpCode::EnumBegin, def.id.index(), &def.name)?;
    for (ordinal, member) in (0u32..).zip(def.decl.members) {
        emitter.emit_named(OpCode::EnumMember, ordinal, member)?;
    }
    emitter.emit(OpCode::EnumEnd);
    Ok(())
}

fn compile_script_body<'ast>(
    ctx: &mut CompilationContext,
    decl: &'ast FunctionDecl<'ast>,
) -> Result<BytecodeChunk> {
    let mut compiler = FunctionCompiler::new(ctx);
    compiler.setup_parameters(decl.params, decl.span);
    compiler.compile_body(&decl.body)?;
    compiler.finish()
}
