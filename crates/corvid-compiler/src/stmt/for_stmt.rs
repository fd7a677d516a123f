//! For loop compilation.

use corvid_core::ast::ForStmt;

use crate::bytecode::OpCode;

use super::{Result, StmtCompiler};

impl<'a, 'ast> StmtCompiler<'a, 'ast> {
    /// Compile a for loop.
    ///
    /// The whole loop sits in a hidden scope so the induction variable is
    /// released afterwards. A missing condition is `true`.
    ///
    /// Bytecode layout:
    /// ```text
    /// [init]
    /// condition:
    /// [condition]
    /// NOT
    /// exit_check:
    /// JUMP_IF -> end
    /// [body]
    /// [increment]
    /// JUMP -> condition
    /// end:
    /// POP n                (locals declared by init)
    /// ```
    pub fn compile_for(&mut self, for_stmt: &ForStmt<'ast>) -> Result<()> {
        self.ctx.tables_mut().locals.enter_scope();
        if let Some(init) = for_stmt.init {
            self.compile(init)?;
        }

        let end = self.emitter.new_label();
        let bounds = self.enter_loop(for_stmt.increment);

        self.emit_loop_test(&bounds, for_stmt.condition, end)?;
        self.compile_scoped(for_stmt.body)?;
        self.exit_loop()?;

        if let Some(increment) = for_stmt.increment {
            self.compile(increment)?;
        }
        self.emitter.emit_jump(OpCode::Jump, bounds.condition);
        self.emitter.bind(end)?;

        let released = self.ctx.tables_mut().locals.exit_scope()?;
        self.emitter.emit_pop(released);
        Ok(())
    }
}
