//! Conditional expressions.

use corvid_core::ast::TernaryExpr;

use super::{ExprCompiler, Result};
use crate::bytecode::OpCode;

/// `cond ? a : b` as condition, `NOT`, `JUMP_IF else`, `a`, `JUMP end`, `b`.
///
/// Either path leaves exactly one value.
pub fn compile_ternary(compiler: &mut ExprCompiler<'_>, expr: &TernaryExpr<'_>) -> Result<()> {
    let else_label = compiler.emitter().new_label();
    let end_label = compiler.emitter().new_label();

    compiler.compile(expr.condition)?;
    compiler.emitter().emit(OpCode::Not);
    compiler.emitter().emit_jump(OpCode::JumpIf, else_label);

    compiler.compile(expr.then_expr)?;
    compiler.emitter().emit_jump(OpCode::Jump, end_label);

    compiler.emitter().bind(else_label)?;
    compiler.compile(expr.else_expr)?;
    compiler.emitter().bind(end_label)
}
