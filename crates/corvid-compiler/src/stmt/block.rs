//! Block statements.

use corvid_core::ast::Block;

use super::{Result, StmtCompiler};

impl<'a, 'ast> StmtCompiler<'a, 'ast> {
    /// Compile a block in a new scope.
    ///
    /// Locals declared inside are released on exit with a single `POP n`;
    /// a block without locals emits no pop at all.
    pub fn compile_block(&mut self, block: &Block<'ast>) -> Result<()> {
        self.ctx.tables_mut().locals.enter_scope();
        for stmt in block.stmts {
            self.compile(stmt)?;
        }
        let released = self.ctx.tables_mut().locals.exit_scope()?;
        self.emitter.emit_pop(released);
        Ok(())
    }
}
