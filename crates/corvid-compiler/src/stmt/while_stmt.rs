//! While loop compilation.

use corvid_core::ast::WhileStmt;

use crate::bytecode::OpCode;

use super::{Result, StmtCompiler};

impl<'a, 'ast> StmtCompiler<'a, 'ast> {
    /// Compile a while loop.
    ///
    /// Bytecode layout:
    /// ```text
    /// condition:
    /// [condition]
    /// NOT
    /// exit_check:
    /// JUMP_IF -> end
    /// [body]
    /// JUMP -> condition
    /// end:
    /// ```
    pub fn compile_while(&mut self, while_stmt: &WhileStmt<'ast>) -> Result<()> {
        let end = self.emitter.new_label();
        let bounds = self.enter_loop(None);

        self.emit_loop_test(&bounds, Some(while_stmt.condition), end)?;
        self.compile_scoped(while_stmt.body)?;
        self.exit_loop()?;

        self.emitter.emit_jump(OpCode::Jump, bounds.condition);
        self.emitter.bind(end)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::expr::test_support::{assign, binary, boolean, int, var};
    use bumpalo::Bump;
    use corvid_core::{CompilationError, DataType};
    use corvid_core::ast::{AssignOp, BinaryOp};

    #[test]
    fn loop_re_enters_condition() {
        // while (x < 3) x += 1;
        let arena = Bump::new();
        let condition = binary(&arena, var("x"), BinaryOp::Less, int(3), DataType::Bool);
        let body = expr_stmt(&arena, assign(&arena, "x", AssignOp::AddAssign, int(1)));
        let stmt = arena.alloc(while_loop(&arena, condition, body));
        let chunk = compile_stmt(stmt);

        chunk.assert_opcodes(&[
            OpCode::PushAddress,
            OpCode::DerefAbsolute,
            OpCode::PushInt,
            OpCode::Lt,
            OpCode::Not,
            OpCode::JumpIf,
            OpCode::PushAddress,
            OpCode::DerefAbsolute,
            OpCode::PushInt,
            OpCode::Add,
            OpCode::PushAddress,
            OpCode::MutateAbsolute,
            OpCode::Jump,
        ]);
        assert_eq!(chunk.get(5).unwrap().jump_target(), Some(13));
        assert_eq!(chunk.get(12).unwrap().jump_target(), Some(0));
        assert_eq!(chunk.end_depths().into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn nested_break_and_continue_target_innermost() {
        // while (true) { while (false) { continue; } break; }
        let arena = Bump::new();
        let inner = while_loop(&arena, boolean(false), block(&arena, vec![cont()]));
        let outer_body = block(&arena, vec![inner, brk()]);
        let stmt = arena.alloc(while_loop(&arena, boolean(true), outer_body));
        let chunk = compile_stmt(stmt);

        // 0 true, 1 not, 2 jump_if; inner: 3 false, 4 not, 5 jump_if,
        // 6 jump (continue), 7 jump (back); 8 true, 9 jump (break), 10 jump
        chunk.assert_opcodes(&[
            OpCode::PushBool,
            OpCode::Not,
            OpCode::JumpIf,
            OpCode::PushBool,
            OpCode::Not,
            OpCode::JumpIf,
            OpCode::Jump,
            OpCode::Jump,
            OpCode::PushBool,
            OpCode::Jump,
            OpCode::Jump,
        ]);
        assert_eq!(chunk.get(5).unwrap().jump_target(), Some(8));
        assert_eq!(chunk.get(6).unwrap().jump_target(), Some(3));
        assert_eq!(chunk.get(7).unwrap().jump_target(), Some(3));
        assert_eq!(chunk.get(9).unwrap().jump_target(), Some(2));
        assert_eq!(chunk.get(2).unwrap().jump_target(), Some(11));
        assert_eq!(chunk.get(10).unwrap().jump_target(), Some(0));
        assert_eq!(chunk.end_depths().into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn loop_control_rejected_after_loop_ends() {
        let arena = Bump::new();
        let loop_stmt = while_loop(&arena, boolean(false), block(&arena, vec![]));
        let stmt = arena.alloc(block(&arena, vec![loop_stmt, brk()]));
        let err = compile_in(&mut context(), stmt).unwrap_err();
        assert!(matches!(
            err,
            CompilationError::UnboundLoopControl { keyword: "break", .. }
        ));
    }
}
