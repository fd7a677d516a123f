//! Return statements.

use corvid_core::ast::ReturnStmt;

use super::{Result, StmtCompiler};

impl<'a, 'ast> StmtCompiler<'a, 'ast> {
    /// `return e;` is `e; RETURN`. A bare `return;` returns null.
    pub fn compile_return(&mut self, ret: &ReturnStmt<'ast>) -> Result<()> {
        match ret.value {
            Some(value) => {
                self.expr_compiler().compile(value)?;
                self.emitter.emit_return();
            }
            None => self.emitter.emit_return_void(),
        }
        Ok(())
    }
}
