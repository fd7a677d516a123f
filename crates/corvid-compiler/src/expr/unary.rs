//! Unary operators.
//!
//! Negation has no opcode of its own: `-e` is `0 - e` in the operand's
//! type. Logical and bitwise not each map to a single opcode.

use corvid_core::ast::{UnaryExpr, UnaryOp};

use super::literals::emit_small_constant;
use super::{ExprCompiler, Result};
use crate::bytecode::OpCode;

pub fn compile_unary(compiler: &mut ExprCompiler<'_>, expr: &UnaryExpr<'_>) -> Result<()> {
    match expr.op {
        UnaryOp::Neg => {
            emit_small_constant(compiler.emitter(), expr.operand.data_type(), 0, expr.span)?;
            compiler.compile(expr.operand)?;
            compiler.emitter().emit(OpCode::Sub);
        }
        UnaryOp::LogicalNot => {
            compiler.compile(expr.operand)?;
            compiler.emitter().emit(OpCode::Not);
        }
        UnaryOp::BitwiseNot => {
            compiler.compile(expr.operand)?;
            compiler.emitter().emit(OpCode::BitNot);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Operand;
    use crate::context::CompilationContext;
    use crate::emit::BytecodeEmitter;
    use crate::expr::test_support::{boolean, ident_of};
    use bumpalo::Bump;
    use corvid_core::ast::{Expr, LiteralExpr, LiteralKind};
    use corvid_core::{DataType, Span};

    fn unary<'ast>(arena: &'ast Bump, op: UnaryOp, operand: Expr<'ast>) -> UnaryExpr<'ast> {
        UnaryExpr {
            op,
            operand: arena.alloc(operand),
            span: Span::default(),
        }
    }

    #[test]
    fn negate_subtracts_from_typed_zero() {
        let arena = Bump::new();
        let mut ctx = CompilationContext::new();
        ctx.tables_mut().locals.declare("d", Span::default());
        let mut emitter = BytecodeEmitter::new();
        let mut compiler = ExprCompiler::new(&mut ctx, &mut emitter);
        let expr = unary(&arena, UnaryOp::Neg, Expr::Ident(ident_of("d", DataType::Double)));
        compile_unary(&mut compiler, &expr).unwrap();

        let chunk = emitter.finish().unwrap();
        chunk.assert_opcodes(&[
            OpCode::PushDouble,
            OpCode::PushAddress,
            OpCode::DerefRelative,
            OpCode::Sub,
        ]);
        assert_eq!(chunk.get(0).unwrap().operands().unwrap(), vec![Operand::F64(0.0)]);
    }

    #[test]
    fn negate_long_literal() {
        let arena = Bump::new();
        let mut ctx = CompilationContext::new();
        let mut emitter = BytecodeEmitter::new();
        let mut compiler = ExprCompiler::new(&mut ctx, &mut emitter);
        let literal = Expr::Literal(LiteralExpr {
            kind: LiteralKind::Long(9),
            span: Span::default(),
        });
        compile_unary(&mut compiler, &unary(&arena, UnaryOp::Neg, literal)).unwrap();
        emitter
            .finish()
            .unwrap()
            .assert_opcodes(&[OpCode::PushLong, OpCode::PushLong, OpCode::Sub]);
    }

    #[test]
    fn negate_non_numeric_is_internal() {
        let arena = Bump::new();
        let mut ctx = CompilationContext::new();
        let mut emitter = BytecodeEmitter::new();
        let mut compiler = ExprCompiler::new(&mut ctx, &mut emitter);
        let err = compile_unary(&mut compiler, &unary(&arena, UnaryOp::Neg, boolean(true)))
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn not_ops_are_single_instructions() {
        let arena = Bump::new();
        let mut ctx = CompilationContext::new();
        let mut emitter = BytecodeEmitter::new();
        let mut compiler = ExprCompiler::new(&mut ctx, &mut emitter);
        compile_unary(&mut compiler, &unary(&arena, UnaryOp::LogicalNot, boolean(false))).unwrap();
        compile_unary(&mut compiler, &unary(&arena, UnaryOp::BitwiseNot, boolean(false))).unwrap();
        emitter.finish().unwrap().assert_opcodes(&[
            OpCode::PushBool,
            OpCode::Not,
            OpCode::PushBool,
            OpCode::BitNot,
        ]);
    }
}
