//! Expression code generation.
//!
//! The [`ExprCompiler`] lowers a typed expression into a postfix run of
//! instructions whose net stack effect is exactly one value. It only ever
//! appends to the emitter.
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = ExprCompiler::new(&mut ctx, &mut emitter);
//!
//! // Leaves the value on the stack
//! compiler.compile(&expr)?;
//!
//! // Runs the expression for its side effects only
//! compiler.compile_for_effect(&expr)?;
//! ```

mod assignment;
mod binary;
mod calls;
mod identifiers;
mod literals;
mod ternary;
mod unary;

pub(crate) use identifiers::Storage;

use corvid_core::ast::Expr;
use corvid_core::{CompilationError, EncodingError, Span};

use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles expressions into the current body.
pub struct ExprCompiler<'a> {
    ctx: &'a mut CompilationContext,
    emitter: &'a mut BytecodeEmitter,
}

impl<'a> ExprCompiler<'a> {
    pub fn new(ctx: &'a mut CompilationContext, emitter: &'a mut BytecodeEmitter) -> Self {
        Self { ctx, emitter }
    }

    /// Compile an expression, leaving its value on the stack.
    pub fn compile(&mut self, expr: &Expr<'_>) -> Result<()> {
        match expr {
            Expr::Literal(lit) => literals::compile_literal(self, lit),
            Expr::Ident(ident) => identifiers::compile_ident(self, ident),
            Expr::Binary(bin) => binary::compile_binary(self, bin),
            Expr::Unary(un) => unary::compile_unary(self, un),
            Expr::Assign(assign) => assignment::compile_assign(self, assign, true),
            Expr::Step(step) => assignment::compile_step(self, step, true),
            Expr::Ternary(ternary) => ternary::compile_ternary(self, ternary),
            Expr::Call(call) => calls::compile_call(self, call),
            Expr::EnumMember(member) => literals::compile_enum_member(self, member),
        }
    }

    /// Compile an expression whose value is not used.
    ///
    /// Assignments and increments write without keeping their result; any
    /// other expression is followed by `POP 1`.
    pub fn compile_for_effect(&mut self, expr: &Expr<'_>) -> Result<()> {
        match expr {
            Expr::Assign(assign) => assignment::compile_assign(self, assign, false),
            Expr::Step(step) => assignment::compile_step(self, step, false),
            _ => {
                self.compile(expr)?;
                self.emitter.emit_pop(1);
                Ok(())
            }
        }
    }

    pub(crate) fn ctx(&self) -> &CompilationContext {
        self.ctx
    }

    pub(crate) fn emitter(&mut self) -> &mut BytecodeEmitter {
        self.emitter
    }
}

/// Attach a source position to an encoding failure.
pub(crate) fn encoding_error(span: Span) -> impl FnOnce(EncodingError) -> CompilationError {
    move |source| CompilationError::Encoding { source, span }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Arena helpers for building typed expressions in tests.

    use bumpalo::Bump;
    use corvid_core::ast::*;
    use corvid_core::{DataType, Span};

    pub fn int<'ast>(value: i32) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            kind: LiteralKind::Int(value),
            span: Span::default(),
        })
    }

    pub fn boolean<'ast>(value: bool) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            kind: LiteralKind::Bool(value),
            span: Span::default(),
        })
    }

    pub fn ident_of<'ast>(name: &'ast str, ty: DataType<'ast>) -> IdentExpr<'ast> {
        IdentExpr {
            name,
            ty,
            span: Span::default(),
        }
    }

    pub fn var<'ast>(name: &'ast str) -> Expr<'ast> {
        Expr::Ident(ident_of(name, DataType::Int))
    }

    pub fn binary<'ast>(
        arena: &'ast Bump,
        left: Expr<'ast>,
        op: BinaryOp,
        right: Expr<'ast>,
        ty: DataType<'ast>,
    ) -> Expr<'ast> {
        Expr::Binary(arena.alloc(BinaryExpr {
            left: arena.alloc(left),
            op,
            right: arena.alloc(right),
            ty,
            span: Span::default(),
        }))
    }

    pub fn assign<'ast>(
        arena: &'ast Bump,
        target: &'ast str,
        op: AssignOp,
        value: Expr<'ast>,
    ) -> Expr<'ast> {
        Expr::Assign(arena.alloc(AssignExpr {
            target: ident_of(target, DataType::Int),
            op,
            value: arena.alloc(value),
            span: Span::default(),
        }))
    }

    pub fn step<'ast>(
        arena: &'ast Bump,
        target: &'ast str,
        op: StepOp,
        fixity: Fixity,
    ) -> Expr<'ast> {
        Expr::Step(arena.alloc(StepExpr {
            target: ident_of(target, DataType::Int),
            op,
            fixity,
            span: Span::default(),
        }))
    }
}
