//! Binary operators.

use corvid_core::ast::{BinaryExpr, BinaryOp};

use super::{ExprCompiler, Result};
use crate::bytecode::OpCode;

/// Left operand, right operand, then the operator.
pub fn compile_binary(compiler: &mut ExprCompiler<'_>, expr: &BinaryExpr<'_>) -> Result<()> {
    compiler.compile(expr.left)?;
    compiler.compile(expr.right)?;
    compiler.emitter().emit(binary_opcode(expr.op));
    Ok(())
}

pub fn binary_opcode(op: BinaryOp) -> OpCode {
    match op {
        BinaryOp::LogicalOr => OpCode::Or,
        BinaryOp::LogicalAnd => OpCode::And,
        BinaryOp::BitwiseOr => OpCode::BitOr,
        BinaryOp::BitwiseXor => OpCode::BitXor,
        BinaryOp::BitwiseAnd => OpCode::BitAnd,
        BinaryOp::Equal => OpCode::Eq,
        BinaryOp::NotEqual => OpCode::Ne,
        BinaryOp::Less => OpCode::Lt,
        BinaryOp::LessEqual => OpCode::Le,
        BinaryOp::Greater => OpCode::Gt,
        BinaryOp::GreaterEqual => OpCode::Ge,
        BinaryOp::ShiftLeft => OpCode::Shl,
        BinaryOp::ShiftRight => OpCode::Shr,
        BinaryOp::Add => OpCode::Add,
        BinaryOp::Sub => OpCode::Sub,
        BinaryOp::Mul => OpCode::Mul,
        BinaryOp::Div => OpCode::Div,
        BinaryOp::Mod => OpCode::Mod,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Operand;
    use crate::context::CompilationContext;
    use crate::emit::BytecodeEmitter;
    use crate::expr::test_support::{binary, int, var};
    use bumpalo::Bump;
    use corvid_core::{DataType, Span};

    #[test]
    fn post_order_left_to_right() {
        // (1 - x) * 3
        let arena = Bump::new();
        let inner = binary(&arena, int(1), BinaryOp::Sub, var("x"), DataType::Int);
        let expr = binary(&arena, inner, BinaryOp::Mul, int(3), DataType::Int);

        let mut ctx = CompilationContext::new();
        ctx.tables_mut().locals.declare("x", Span::default());
        let mut emitter = BytecodeEmitter::new();
        ExprCompiler::new(&mut ctx, &mut emitter).compile(&expr).unwrap();

        let chunk = emitter.finish().unwrap();
        chunk.assert_opcodes(&[
            OpCode::PushInt,
            OpCode::PushAddress,
            OpCode::DerefRelative,
            OpCode::Sub,
            OpCode::PushInt,
            OpCode::Mul,
        ]);
        assert_eq!(chunk.get(0).unwrap().operands().unwrap(), vec![Operand::I32(1)]);
        assert_eq!(chunk.get(4).unwrap().operands().unwrap(), vec![Operand::I32(3)]);
    }

    #[test]
    fn every_operator_has_an_opcode() {
        assert_eq!(binary_opcode(BinaryOp::LogicalAnd), OpCode::And);
        assert_eq!(binary_opcode(BinaryOp::GreaterEqual), OpCode::Ge);
        assert_eq!(binary_opcode(BinaryOp::ShiftRight), OpCode::Shr);
        assert_eq!(binary_opcode(BinaryOp::BitwiseXor), OpCode::BitXor);
    }
}
