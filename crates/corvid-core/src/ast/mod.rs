//! The typed syntax tree handed to the back end.
//!
//! Trees are produced by the type checker, allocated in a `bumpalo` arena
//! and borrowed for `'ast`. Every expression leaf carries its resolved
//! [`DataType`](crate::DataType) and every reference to a global, function
//! or enum uses its fully qualified name.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use corvid_core::Span;
//! use corvid_core::ast::*;
//!
//! let arena = Bump::new();
//! let body = Block { stmts: &[], span: Span::default() };
//! let main = arena.alloc(FunctionDecl {
//!     name: "main",
//!     params: &[],
//!     return_type: None,
//!     body,
//!     span: Span::default(),
//! });
//! let items = arena.alloc_slice_copy(&[Item::Function(main)]);
//! let script = Script::new(items, Span::default());
//! assert_eq!(script.items().len(), 1);
//! ```

pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use stmt::*;

use crate::Span;

/// A complete typed script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Script<'ast> {
    items: &'ast [Item<'ast>],
    span: Span,
}

impl<'ast> Script<'ast> {
    pub fn new(items: &'ast [Item<'ast>], span: Span) -> Self {
        Self { items, span }
    }

    /// Get the top-level items.
    pub fn items(&self) -> &'ast [Item<'ast>] {
        self.items
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
