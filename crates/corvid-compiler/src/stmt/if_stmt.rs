//! If/else statements.

use corvid_core::ast::IfStmt;

use crate::bytecode::OpCode;

use super::{Result, StmtCompiler};

impl<'a, 'ast> StmtCompiler<'a, 'ast> {
    /// Compile an if statement.
    ///
    /// Bytecode layout:
    /// ```text
    /// [condition]
    /// NOT
    /// JUMP_IF -> else (or end)
    /// [then]
    /// JUMP -> end          (only with else)
    /// else:
    /// [else]
    /// end:
    /// ```
    pub fn compile_if(&mut self, if_stmt: &IfStmt<'ast>) -> Result<()> {
        let end = self.emitter.new_label();

        self.expr_compiler().compile(if_stmt.condition)?;
        self.emitter.emit(OpCode::Not);

        match if_stmt.else_stmt {
            Some(else_stmt) => {
                let else_label = self.emitter.new_label();
                self.emitter.emit_jump(OpCode::JumpIf, else_label);
                self.compile_scoped(if_stmt.then_stmt)?;
                self.emitter.emit_jump(OpCode::Jump, end);

                self.emitter.bind(else_label)?;
                self.compile_scoped(else_stmt)?;
            }
            None => {
                self.emitter.emit_jump(OpCode::JumpIf, end);
                self.compile_scoped(if_stmt.then_stmt)?;
            }
        }

        self.emitter.bind(end)
    }
}
