//! Do-while loop compilation.

use corvid_core::ast::DoWhileStmt;

use crate::bytecode::OpCode;

use super::{Result, StmtCompiler};

impl<'a, 'ast> StmtCompiler<'a, 'ast> {
    /// Compile a do-while loop.
    ///
    /// Same shape as `while`, entered past the first condition check:
    /// ```text
    /// JUMP -> body
    /// condition:
    /// [condition]
    /// NOT
    /// exit_check:
    /// JUMP_IF -> end
    /// body:
    /// [body]
    /// JUMP -> condition
    /// end:
    /// ```
    pub fn compile_do_while(&mut self, do_while: &DoWhileStmt<'ast>) -> Result<()> {
        let body = self.emitter.new_label();
        let end = self.emitter.new_label();
        let bounds = self.enter_loop(None);

        self.emitter.emit_jump(OpCode::Jump, body);
        self.emit_loop_test(&bounds, Some(do_while.condition), end)?;

        self.emitter.bind(body)?;
        self.compile_scoped(do_while.body)?;
        self.exit_loop()?;

        self.emitter.emit_jump(OpCode::Jump, bounds.condition);
        self.emitter.bind(end)
    }
}
