//! Function compiler for generating bytecode from function bodies.
//!
//! This module provides [`FunctionCompiler`] which compiles a single body to
//! bytecode. It handles:
//!
//! - Declaring parameters as the frame's first local slots
//! - Compiling body statements
//! - Adding the implicit `PUSH_NULL; RETURN` that ends every script body
//!
//! The caller gives it a fresh frame with
//! [`SymbolTables::begin_frame`](crate::symbols::SymbolTables::begin_frame).
//!
//! # Example
//!
//! ```ignore
//! let previous = ctx.tables_mut().begin_frame();
//! let mut compiler = FunctionCompiler::new(&mut ctx);
//! compiler.setup_parameters(decl.params, decl.span);
//! compiler.compile_body(&decl.body)?;
//! let body = compiler.finish();
//! ctx.tables_mut().end_frame(previous);
//! ```

use corvid_core::ast::{Block, Param, Stmt};
use corvid_core::{CompilationError, Span};

use crate::bytecode::BytecodeChunk;
use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;
use crate::stmt::StmtCompiler;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles a single function body (or the ordinary stream) to bytecode.
pub struct FunctionCompiler<'a> {
    ctx: &'a mut CompilationContext,
    emitter: BytecodeEmitter,
}

impl<'a> FunctionCompiler<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self {
            ctx,
            emitter: BytecodeEmitter::new(),
        }
    }

    /// Declare parameters in order; parameter `i` lives in slot `i`.
    pub fn setup_parameters(&mut self, params: &[Param<'_>], span: Span) {
        let locals = &mut self.ctx.tables_mut().locals;
        for param in params {
            locals.declare_param(param.name, span);
        }
    }

    /// Compile a function body block.
    pub fn compile_body<'ast>(&mut self, body: &'ast Block<'ast>) -> Result<()> {
        StmtCompiler::new(self.ctx, &mut self.emitter).compile_block(body)
    }

    /// Compile statements that share one frame, as the ordinary stream does.
    pub fn compile_statements<'ast>(&mut self, stmts: &[&'ast Stmt<'ast>]) -> Result<()> {
        let mut compiler = StmtCompiler::new(self.ctx, &mut self.emitter);
        for &stmt in stmts {
            compiler.compile(stmt)?;
        }
        Ok(())
    }

    /// Append the implicit void return and resolve every jump.
    pub fn finish(mut self) -> Result<BytecodeChunk> {
        self.emitter.emit_return_void();
        self.emitter.finish()
    }

    /// Resolve every jump without adding a return.
    pub fn finish_stream(self) -> Result<BytecodeChunk> {
        self.emitter.finish()
    }
}
