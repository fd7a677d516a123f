//! Local variable declarations.

use corvid_core::ast::VarDeclStmt;

use super::{Result, StmtCompiler};

impl<'a, 'ast> StmtCompiler<'a, 'ast> {
    /// Compile a local declaration.
    ///
    /// The initializer (or the type's default) is pushed and that stack
    /// position becomes the variable's slot. The name is declared after
    /// the initializer so `int x = x;` reads an outer `x`.
    pub fn compile_var_decl(&mut self, decl: &VarDeclStmt<'ast>) -> Result<()> {
        match decl.init {
            Some(init) => self.expr_compiler().compile(init)?,
            None => {
                let tag = self.ctx.tables().type_tag(&decl.ty, decl.span)?;
                self.emitter.emit_default(tag);
            }
        }
        self.ctx.tables_mut().locals.declare(decl.name, decl.span);
        Ok(())
    }
}
