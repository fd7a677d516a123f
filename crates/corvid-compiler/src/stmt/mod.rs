//! Statement code generation.
//!
//! The [`StmtCompiler`] lowers statements into instructions with a net
//! stack effect of zero. Structured control flow becomes `JUMP`/`JUMP_IF`
//! to labels that the emitter resolves when the body is finished:
//! - Blocks open a scope and pop their locals on exit
//! - If/else and all loops test an inverted condition with `JUMP_IF`
//! - `break` and `continue` target the innermost active loop
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = StmtCompiler::new(&mut ctx, &mut emitter);
//! compiler.compile(&stmt)?;
//! let chunk = emitter.finish()?;
//! ```

mod block;
mod do_while_stmt;
mod for_stmt;
mod if_stmt;
mod return_stmt;
mod var_decl;
mod while_stmt;

use corvid_core::ast::{BreakStmt, ContinueStmt, Expr, ExprStmt, Stmt};
use corvid_core::{CompilationError, Span};

use crate::bytecode::OpCode;
use crate::context::CompilationContext;
use crate::emit::{BytecodeEmitter, JumpManager, Label, LoopBounds};
use crate::expr::ExprCompiler;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles statements into the current body.
///
/// Locals go to the context's current frame; loop bookkeeping lives here
/// and starts empty for every body.
pub struct StmtCompiler<'a, 'ast> {
    ctx: &'a mut CompilationContext,
    emitter: &'a mut BytecodeEmitter,
    jumps: JumpManager<'ast>,
}

impl<'a, 'ast> StmtCompiler<'a, 'ast> {
    pub fn new(ctx: &'a mut CompilationContext, emitter: &'a mut BytecodeEmitter) -> Self {
        Self {
            ctx,
            emitter,
            jumps: JumpManager::new(),
        }
    }

    /// Compile a statement.
    pub fn compile(&mut self, stmt: &'ast Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Expr(expr_stmt) => self.compile_expr_stmt(expr_stmt),
            Stmt::VarDecl(var_decl) => self.compile_var_decl(var_decl),
            Stmt::Return(ret) => self.compile_return(ret),
            Stmt::Break(brk) => self.compile_break(brk),
            Stmt::Continue(cont) => self.compile_continue(cont),
            Stmt::Block(block) => self.compile_block(block),
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
            Stmt::While(while_stmt) => self.compile_while(while_stmt),
            Stmt::DoWhile(do_while) => self.compile_do_while(do_while),
            Stmt::For(for_stmt) => self.compile_for(for_stmt),
        }
    }

    /// Compile a branch or loop body in its own scope.
    ///
    /// Blocks already open one; a lone declaration such as
    /// `while (c) int t = 0;` still gets its slot released.
    fn compile_scoped(&mut self, stmt: &'ast Stmt<'ast>) -> Result<()> {
        if let Stmt::Block(block) = stmt {
            return self.compile_block(block);
        }
        self.ctx.tables_mut().locals.enter_scope();
        self.compile(stmt)?;
        let released = self.ctx.tables_mut().locals.exit_scope()?;
        self.emitter.emit_pop(released);
        Ok(())
    }

    /// Evaluate an expression for its side effects.
    fn compile_expr_stmt(&mut self, expr_stmt: &ExprStmt<'ast>) -> Result<()> {
        self.expr_compiler().compile_for_effect(expr_stmt.expr)
    }

    /// `break`: release the loop body's locals, push `true` and jump to the
    /// loop's exit check, which then leaves the loop.
    ///
    /// Landing on the exit `JUMP_IF` is the same as landing just after it:
    /// the jump consumes the pushed `true` and always branches to the end.
    fn compile_break(&mut self, brk: &BreakStmt) -> Result<()> {
        let bounds = self.innermost_loop("break", brk.span)?;
        self.pop_to(bounds.slot_base);
        self.emitter.emit_bool(true);
        self.emitter.emit_jump(OpCode::Jump, bounds.exit_check);
        Ok(())
    }

    /// `continue`: release the loop body's locals, run a `for` increment and
    /// jump back to the condition.
    fn compile_continue(&mut self, cont: &ContinueStmt) -> Result<()> {
        let bounds = self.innermost_loop("continue", cont.span)?;
        self.pop_to(bounds.slot_base);
        if let Some(increment) = bounds.increment {
            self.compile_at_loop_entry(&bounds, increment)?;
        }
        self.emitter.emit_jump(OpCode::Jump, bounds.condition);
        Ok(())
    }

    /// Compile `stmt` with only the locals visible at loop entry, so names
    /// declared in the body cannot capture it. The body's scopes are
    /// restored afterwards.
    fn compile_at_loop_entry(
        &mut self,
        bounds: &LoopBounds<'ast>,
        stmt: &'ast Stmt<'ast>,
    ) -> Result<()> {
        let body_scopes = self.ctx.tables().locals.clone();
        let locals = &mut self.ctx.tables_mut().locals;
        let mut result = Ok(());
        while result.is_ok() && locals.depth() > bounds.scope_depth {
            result = locals.exit_scope().map(|_| ());
        }
        let result = result.and_then(|()| self.compile(stmt));
        self.ctx.tables_mut().locals = body_scopes;
        result
    }

    fn innermost_loop(&self, keyword: &'static str, span: Span) -> Result<LoopBounds<'ast>> {
        self.jumps
            .current()
            .copied()
            .ok_or(CompilationError::UnboundLoopControl { keyword, span })
    }

    /// Pop every local slot above `base`.
    fn pop_to(&mut self, base: u32) {
        let live = self.ctx.tables().locals.slot_count();
        self.emitter.emit_pop(live.saturating_sub(base));
    }

    /// Labels for a loop, registered as the innermost loop.
    fn enter_loop(&mut self, increment: Option<&'ast Stmt<'ast>>) -> LoopBounds<'ast> {
        let bounds = LoopBounds {
            condition: self.emitter.new_label(),
            exit_check: self.emitter.new_label(),
            increment,
            slot_base: self.ctx.tables().locals.slot_count(),
            scope_depth: self.ctx.tables().locals.depth(),
        };
        self.jumps.enter_loop(bounds);
        bounds
    }

    fn exit_loop(&mut self) -> Result<()> {
        self.jumps
            .exit_loop()
            .map(|_| ())
            .ok_or_else(|| CompilationError::internal("exit_loop without an active loop"))
    }

    /// Emit `cond; NOT; exit_check: JUMP_IF end`, binding the loop's
    /// condition label first. A missing condition always continues.
    fn emit_loop_test(
        &mut self,
        bounds: &LoopBounds<'ast>,
        condition: Option<&'ast Expr<'ast>>,
        end: Label,
    ) -> Result<()> {
        self.emitter.bind(bounds.condition)?;
        match condition {
            Some(condition) => self.expr_compiler().compile(condition)?,
            None => self.emitter.emit_bool(true),
        }
        self.emitter.emit(OpCode::Not);
        self.emitter.bind(bounds.exit_check)?;
        self.emitter.emit_jump(OpCode::JumpIf, end);
        Ok(())
    }

    /// Create an expression compiler over the same context and body.
    fn expr_compiler(&mut self) -> ExprCompiler<'_> {
        ExprCompiler::new(self.ctx, self.emitter)
    }
}
