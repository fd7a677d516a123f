//! Typed expression nodes.
//!
//! Every node arrives from the type checker with its static type resolved
//! and every non-local name fully qualified (`module::name`). Nodes borrow
//! from an arena and are `Copy`.

use crate::Span;
use crate::ast::{AssignOp, BinaryOp, Fixity, StepOp, UnaryOp};
use crate::data_type::DataType;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Variable reference
    Ident(IdentExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Plain or compound assignment
    Assign(&'ast AssignExpr<'ast>),
    /// `++` / `--` in either position
    Step(&'ast StepExpr<'ast>),
    /// Ternary conditional (? :)
    Ternary(&'ast TernaryExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
    /// `Enum::Member`
    EnumMember(EnumMemberExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Assign(e) => e.span,
            Self::Step(e) => e.span,
            Self::Ternary(e) => e.span,
            Self::Call(e) => e.span,
            Self::EnumMember(e) => e.span,
        }
    }

    /// The static type the type checker assigned to this expression.
    ///
    /// Calls to functions without a return value report `Null`, matching the
    /// value such calls leave on the stack.
    pub fn data_type(&self) -> DataType<'ast> {
        match self {
            Self::Literal(e) => e.kind.data_type(),
            Self::Ident(e) => e.ty,
            Self::Binary(e) => e.ty,
            Self::Unary(e) => e.operand.data_type(),
            Self::Assign(e) => e.target.ty,
            Self::Step(e) => e.target.ty,
            Self::Ternary(e) => e.ty,
            Self::Call(e) => e.return_type.unwrap_or(DataType::Null),
            Self::EnumMember(e) => DataType::Enum(e.enum_name),
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(&'ast str),
    Null,
}

impl<'ast> LiteralKind<'ast> {
    pub fn data_type(&self) -> DataType<'ast> {
        match self {
            LiteralKind::Bool(_) => DataType::Bool,
            LiteralKind::Char(_) => DataType::Char,
            LiteralKind::Int(_) => DataType::Int,
            LiteralKind::Long(_) => DataType::Long,
            LiteralKind::Float(_) => DataType::Float,
            LiteralKind::Double(_) => DataType::Double,
            LiteralKind::String(_) => DataType::String,
            LiteralKind::Null => DataType::Null,
        }
    }
}

/// A variable reference.
///
/// Locals use their plain name; globals use their qualified name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    pub name: &'ast str,
    pub ty: DataType<'ast>,
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    /// Result type
    pub ty: DataType<'ast>,
    pub span: Span,
}

/// A unary prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

/// An assignment. The target is always a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignExpr<'ast> {
    pub target: IdentExpr<'ast>,
    pub op: AssignOp,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// An increment or decrement of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepExpr<'ast> {
    pub target: IdentExpr<'ast>,
    pub op: StepOp,
    pub fixity: Fixity,
    pub span: Span,
}

/// A ternary conditional expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TernaryExpr<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_expr: &'ast Expr<'ast>,
    pub else_expr: &'ast Expr<'ast>,
    pub ty: DataType<'ast>,
    pub span: Span,
}

/// A call to a script or native function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// Fully qualified callee name
    pub callee: &'ast str,
    pub args: &'ast [Expr<'ast>],
    /// `None` for functions without a return value
    pub return_type: Option<DataType<'ast>>,
    pub span: Span,
}

/// Access to a member of an enumerated type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumMemberExpr<'ast> {
    /// Fully qualified enum name
    pub enum_name: &'ast str,
    pub member: &'ast str,
    pub span: Span,
}
