//! Registration Pass (Pass 1) - assign every address and id up front.
//!
//! This pass walks the script and registers all declarations in the symbol
//! tables before any instruction is emitted, so a body can reference a
//! function, global or enum declared further down.
//!
//! ## Responsibilities
//!
//! - Qualify names with the enclosing module path
//! - Register enums first, so parameter types can name any of them
//! - Register script and native function signatures
//! - Allocate absolute addresses for globals
//! - Collect the statements of the ordinary instruction stream

use corvid_core::ast::{
    EnumDecl, FunctionDecl, Item, NativeFunctionDecl, Param, Script, Stmt, VarDeclStmt,
};
use corvid_core::{CompilationError, Span};
use tracing::debug;

use crate::bytecode::TypeTag;
use crate::context::CompilationContext;
use crate::ids::{EnumId, FunctionId, GlobalAddress};
use crate::symbols::FunctionKind;

type Result<T> = std::result::Result<T, CompilationError>;

/// A registered global variable.
#[derive(Debug, Clone)]
pub struct GlobalDef<'ast> {
    pub name: String,
    pub address: GlobalAddress,
    pub decl: &'ast VarDeclStmt<'ast>,
}

/// A registered enum.
#[derive(Debug, Clone)]
pub struct EnumDef<'ast> {
    pub id: EnumId,
    pub name: String,
    pub decl: &'ast EnumDecl<'ast>,
}

/// Where a function's instructions come from.
#[derive(Debug, Clone, Copy)]
pub enum FunctionBody<'ast> {
    Script(&'ast FunctionDecl<'ast>),
    Native(&'ast NativeFunctionDecl<'ast>),
}

impl FunctionBody<'_> {
    pub fn span(&self) -> Span {
        match self {
            FunctionBody::Script(decl) => decl.span,
            FunctionBody::Native(decl) => decl.span,
        }
    }
}

/// A registered function signature.
#[derive(Debug, Clone)]
pub struct FunctionDef<'ast> {
    pub id: FunctionId,
    pub name: String,
    pub params: Vec<TypeTag>,
    pub body: FunctionBody<'ast>,
}

/// Output of the registration pass, in discovery order.
#[derive(Debug, Default)]
pub struct RegistrationOutput<'ast> {
    pub globals: Vec<GlobalDef<'ast>>,
    pub enums: Vec<EnumDef<'ast>>,
    pub functions: Vec<FunctionDef<'ast>>,
    /// Statements of the ordinary instruction stream.
    pub statements: Vec<&'ast Stmt<'ast>>,
}

/// Pass 1: register every declaration of a script.
pub struct RegistrationPass<'a, 'ast> {
    ctx: &'a mut CompilationContext,
    output: RegistrationOutput<'ast>,
}

impl<'a, 'ast> RegistrationPass<'a, 'ast> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self {
            ctx,
            output: RegistrationOutput::default(),
        }
    }

    /// Run the registration pass on a script.
    pub fn run(mut self, script: &Script<'ast>) -> Result<RegistrationOutput<'ast>> {
        for item in script.items() {
            self.visit_enums(item)?;
        }
        for item in script.items() {
            self.visit_item(item)?;
        }

        debug!(
            target: "corvid::compiler::passes",
            enums = self.output.enums.len(),
            functions = self.output.functions.len(),
            globals = self.output.globals.len(),
            statements = self.output.statements.len(),
            "registration complete"
        );
        Ok(self.output)
    }

    // ==========================================================================
    // Enums
    // ==========================================================================

    fn visit_enums(&mut self, item: &'ast Item<'ast>) -> Result<()> {
        match item {
            Item::Module(module) => {
                self.ctx.enter_module(module.name);
                let result = module.items.iter().try_for_each(|item| self.visit_enums(item));
                self.ctx.exit_module();
                result
            }
            Item::Enum(decl) => self.register_enum(decl),
            _ => Ok(()),
        }
    }

    fn register_enum(&mut self, decl: &'ast EnumDecl<'ast>) -> Result<()> {
        let name = self.ctx.qualified_name(decl.name);
        let id = self
            .ctx
            .tables_mut()
            .enums
            .register(&name, decl.members, decl.span)?;
        self.output.enums.push(EnumDef { id, name, decl });
        Ok(())
    }

    // ==========================================================================
    // Functions, globals and statements
    // ==========================================================================

    fn visit_item(&mut self, item: &'ast Item<'ast>) -> Result<()> {
        match item {
            Item::Module(module) => {
                self.ctx.enter_module(module.name);
                let result = module.items.iter().try_for_each(|item| self.visit_item(item));
                self.ctx.exit_module();
                result
            }
            Item::Function(decl) => {
                self.register_function(decl.name, decl.params, FunctionBody::Script(*decl))
            }
            Item::NativeFunction(decl) => {
                self.register_function(decl.name, decl.params, FunctionBody::Native(*decl))
            }
            Item::Enum(_) => Ok(()),
            Item::Var(decl) | Item::Stmt(Stmt::VarDecl(decl)) => self.register_global(decl),
            Item::Stmt(stmt) => {
                self.output.statements.push(stmt);
                Ok(())
            }
        }
    }

    fn register_function(
        &mut self,
        name: &str,
        params: &[Param<'ast>],
        body: FunctionBody<'ast>,
    ) -> Result<()> {
        let span = body.span();
        let name = self.ctx.qualified_name(name);
        let tags = params
            .iter()
            .map(|param| self.ctx.tables().type_tag(&param.ty, span))
            .collect::<Result<Vec<_>>>()?;
        let kind = match body {
            FunctionBody::Script(_) => FunctionKind::Script,
            FunctionBody::Native(_) => FunctionKind::Native,
        };
        let id = self
            .ctx
            .tables_mut()
            .functions
            .register(&name, tags.clone(), kind, span)?;
        self.output.functions.push(FunctionDef {
            id,
            name,
            params: tags,
            body,
        });
        Ok(())
    }

    fn register_global(&mut self, decl: &'ast VarDeclStmt<'ast>) -> Result<()> {
        let name = self.ctx.qualified_name(decl.name);
        let address = self.ctx.tables_mut().globals.declare(&name, decl.span)?;
        self.output.globals.push(GlobalDef {
            name,
            address,
            decl,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use corvid_core::DataType;
    use corvid_core::ast::{Block, Expr, ExprStmt, LiteralExpr, LiteralKind, ModuleDecl};

    fn function<'ast>(arena: &'ast Bump, name: &'ast str, params: &[Param<'ast>]) -> Item<'ast> {
        Item::Function(arena.alloc(FunctionDecl {
            name,
            params: arena.alloc_slice_copy(params),
            return_type: None,
            body: Block {
                stmts: &[],
                span: Span::default(),
            },
            span: Span::new(1, 1, 2),
        }))
    }

    fn global<'ast>(name: &'ast str) -> VarDeclStmt<'ast> {
        VarDeclStmt {
            name,
            ty: DataType::Int,
            init: None,
            span: Span::default(),
        }
    }

    fn module<'ast>(arena: &'ast Bump, name: &'ast str, items: &[Item<'ast>]) -> Item<'ast> {
        Item::Module(arena.alloc(ModuleDecl {
            name,
            items: arena.alloc_slice_copy(items),
            span: Span::default(),
        }))
    }

    #[test]
    fn names_are_qualified_by_module() {
        let arena = Bump::new();
        let inner = module(
            &arena,
            "ui",
            &[function(&arena, "draw", &[]), Item::Var(global("count"))],
        );
        let items = arena.alloc_slice_copy(&[module(&arena, "app", &[inner])]);
        let script = Script::new(items, Span::default());

        let mut ctx = CompilationContext::new();
        let output = RegistrationPass::new(&mut ctx).run(&script).unwrap();

        assert_eq!(output.functions[0].name, "app::ui::draw");
        assert_eq!(output.globals[0].name, "app::ui::count");
        assert!(ctx.tables().functions.find_entry_point("app::ui::draw").is_some());
        assert!(ctx.tables().globals.get("app::ui::count").is_some());
        assert_eq!(ctx.current_module(), "");
    }

    #[test]
    fn enums_registered_before_signatures() {
        // fn paint(c: Color) declared before enum Color
        let arena = Bump::new();
        let params = [Param {
            name: "c",
            ty: DataType::Enum("Color"),
        }];
        let color = Item::Enum(arena.alloc(EnumDecl {
            name: "Color",
            members: arena.alloc_slice_copy(&["Red", "Green"]),
            span: Span::default(),
        }));
        let items = arena.alloc_slice_copy(&[function(&arena, "paint", &params), color]);
        let script = Script::new(items, Span::default());

        let mut ctx = CompilationContext::new();
        let output = RegistrationPass::new(&mut ctx).run(&script).unwrap();

        let color_id = output.enums[0].id;
        assert_eq!(output.functions[0].params, vec![TypeTag::Enum(color_id)]);
    }

    #[test]
    fn top_level_declarations_become_globals() {
        let arena = Bump::new();
        let one = arena.alloc(Expr::Literal(LiteralExpr {
            kind: LiteralKind::Int(1),
            span: Span::default(),
        }));
        let items = arena.alloc_slice_copy(&[
            Item::Stmt(Stmt::VarDecl(global("a"))),
            Item::Stmt(Stmt::Expr(ExprStmt {
                expr: one,
                span: Span::default(),
            })),
            Item::Var(global("b")),
        ]);
        let script = Script::new(items, Span::default());

        let mut ctx = CompilationContext::new();
        let output = RegistrationPass::new(&mut ctx).run(&script).unwrap();

        let addresses: Vec<_> = output.globals.iter().map(|g| g.address.index()).collect();
        assert_eq!(addresses, vec![0, 1]);
        assert_eq!(output.statements.len(), 1);
    }

    #[test]
    fn duplicate_global_rejected() {
        let arena = Bump::new();
        let items = arena.alloc_slice_copy(&[Item::Var(global("a")), Item::Var(global("a"))]);
        let script = Script::new(items, Span::default());

        let mut ctx = CompilationContext::new();
        let err = RegistrationPass::new(&mut ctx).run(&script).unwrap_err();
        assert!(matches!(err, CompilationError::DuplicateSymbol { kind: "global", .. }));
    }

    #[test]
    fn overloads_get_distinct_ids() {
        let arena = Bump::new();
        let int_param = [Param {
            name: "n",
            ty: DataType::Int,
        }];
        let items = arena.alloc_slice_copy(&[
            function(&arena, "f", &[]),
            function(&arena, "f", &int_param),
        ]);
        let script = Script::new(items, Span::default());

        let mut ctx = CompilationContext::new();
        let output = RegistrationPass::new(&mut ctx).run(&script).unwrap();
        assert_eq!(output.functions[0].id, FunctionId::new(0));
        assert_eq!(output.functions[1].id, FunctionId::new(1));

        let dup = arena.alloc_slice_copy(&[function(&arena, "f", &[])]);
        let err = RegistrationPass::new(&mut ctx)
            .run(&Script::new(dup, Span::default()))
            .unwrap_err();
        assert_eq!(err.span(), Span::new(1, 1, 2));
    }
}
