//! Assignment, compound assignment and increment/decrement.
//!
//! The new value is computed first, then the target's address is pushed and
//! a mutate instruction writes through it. `keep` selects the variant that
//! leaves the stored value on the stack for an enclosing expression.

use corvid_core::ast::{AssignExpr, Fixity, StepExpr};

use super::binary::binary_opcode;
use super::identifiers::{emit_load, emit_store, resolve_storage};
use super::literals::emit_small_constant;
use super::{ExprCompiler, Result};

/// `target = value` or `target op= value`.
///
/// Compound forms load the target before evaluating the right-hand side,
/// so `x -= y` computes `x - y`. Evaluating the right-hand side first and
/// the target second would compute `y - x` with the post-order operator.
pub fn compile_assign(
    compiler: &mut ExprCompiler<'_>,
    expr: &AssignExpr<'_>,
    keep: bool,
) -> Result<()> {
    let storage = resolve_storage(compiler, &expr.target)?;
    match expr.op.to_binary_op() {
        None => compiler.compile(expr.value)?,
        Some(op) => {
            emit_load(compiler, storage);
            compiler.compile(expr.value)?;
            compiler.emitter().emit(binary_opcode(op));
        }
    }
    emit_store(compiler, storage, keep);
    Ok(())
}

/// `++x`, `x++`, `--x`, `x--`.
///
/// A postfix step whose value is used loads the old value once more
/// beneath the update and writes without keeping.
pub fn compile_step(compiler: &mut ExprCompiler<'_>, expr: &StepExpr<'_>, keep: bool) -> Result<()> {
    let storage = resolve_storage(compiler, &expr.target)?;
    let yields_old = keep && expr.fixity == Fixity::Postfix;
    if yields_old {
        emit_load(compiler, storage);
    }
    emit_load(compiler, storage);
    emit_small_constant(compiler.emitter(), expr.target.ty, 1, expr.span)?;
    compiler.emitter().emit(binary_opcode(expr.op.to_binary_op()));
    emit_store(compiler, storage, keep && !yields_old);
    Ok(())
}
