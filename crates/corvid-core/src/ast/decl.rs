//! Declaration nodes.
//!
//! Provides nodes for top-level declarations:
//! - Modules
//! - Script and native functions
//! - Enums
//! - Global variables

use crate::Span;
use crate::ast::stmt::{Block, Stmt, VarDeclStmt};
use crate::data_type::DataType;

/// A top-level item in a script or module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'ast> {
    /// Nested module
    Module(&'ast ModuleDecl<'ast>),
    /// Function with a script body
    Function(&'ast FunctionDecl<'ast>),
    /// Function implemented by the host
    NativeFunction(&'ast NativeFunctionDecl<'ast>),
    /// Enum declaration
    Enum(&'ast EnumDecl<'ast>),
    /// Global variable declaration
    Var(VarDeclStmt<'ast>),
    /// Statement executed in the ordinary instruction stream
    Stmt(Stmt<'ast>),
}

impl<'ast> Item<'ast> {
    /// Get the span of this item.
    pub fn span(&self) -> Span {
        match self {
            Self::Module(d) => d.span,
            Self::Function(d) => d.span,
            Self::NativeFunction(d) => d.span,
            Self::Enum(d) => d.span,
            Self::Var(d) => d.span,
            Self::Stmt(s) => s.span(),
        }
    }
}

/// A module (namespace). Names declared inside are qualified as
/// `outer::inner::name`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleDecl<'ast> {
    pub name: &'ast str,
    pub items: &'ast [Item<'ast>],
    pub span: Span,
}

/// A function parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub name: &'ast str,
    pub ty: DataType<'ast>,
}

/// A function with a script body.
///
/// Examples:
/// - `fn main() { }`
/// - `fn add(a: int, b: int): int { return a + b; }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'ast> {
    /// Unqualified name
    pub name: &'ast str,
    pub params: &'ast [Param<'ast>],
    /// `None` when the function returns no value
    pub return_type: Option<DataType<'ast>>,
    pub body: Block<'ast>,
    pub span: Span,
}

/// A function implemented by the host, bound through a descriptor string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeFunctionDecl<'ast> {
    /// Unqualified name
    pub name: &'ast str,
    pub params: &'ast [Param<'ast>],
    pub return_type: Option<DataType<'ast>>,
    /// Host binding, e.g. `"java.lang.Math.sqrt"`
    pub descriptor: &'ast str,
    pub span: Span,
}

/// An enum declaration with its members in ordinal order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumDecl<'ast> {
    /// Unqualified name
    pub name: &'ast str,
    pub members: &'ast [&'ast str],
    pub span: Span,
}
