//! CompilationContext - state threaded through every codegen call.

use crate::symbols::SymbolTables;

/// Symbol tables plus the module path of the declarations being visited.
///
/// One context belongs to one compilation; nothing here is shared or
/// static.
#[derive(Debug, Clone, Default)]
pub struct CompilationContext {
    tables: SymbolTables,
    module_path: Vec<String>,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously built tables.
    pub fn with_tables(tables: SymbolTables) -> Self {
        Self {
            tables,
            module_path: Vec::new(),
        }
    }

    pub fn tables(&self) -> &SymbolTables {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut SymbolTables {
        &mut self.tables
    }

    pub fn into_tables(self) -> SymbolTables {
        self.tables
    }

    // ==========================================================================
    // Modules
    // ==========================================================================

    pub fn enter_module(&mut self, name: &str) {
        self.module_path.push(name.to_string());
    }

    pub fn exit_module(&mut self) {
        self.module_path.pop();
    }

    /// The current module path joined with `::`; empty at the top level.
    pub fn current_module(&self) -> String {
        self.module_path.join("::")
    }

    /// Qualify a declared name with the current module path.
    pub fn qualified_name(&self, name: &str) -> String {
        qualify(&self.current_module(), name)
    }
}

/// Join a module path and a name with `::`.
pub fn qualify(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}::{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualification_follows_module_nesting() {
        let mut ctx = CompilationContext::new();
        assert_eq!(ctx.qualified_name("main"), "main");

        ctx.enter_module("app");
        ctx.enter_module("ui");
        assert_eq!(ctx.current_module(), "app::ui");
        assert_eq!(ctx.qualified_name("draw"), "app::ui::draw");

        ctx.exit_module();
        assert_eq!(ctx.qualified_name("draw"), "app::draw");
    }

    #[test]
    fn qualify_with_empty_module() {
        assert_eq!(qualify("", "f"), "f");
        assert_eq!(qualify("m", "f"), "m::f");
    }
}
