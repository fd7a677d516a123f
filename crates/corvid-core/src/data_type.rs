//! Resolved types attached to tree nodes by the type checker.

use std::fmt;

/// The static type of a typed node.
///
/// Enumerated types are named by their fully qualified name; the back end
/// turns that name into a numeric enum id when it encodes the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType<'ast> {
    Bool,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
    /// The type of `null`, assignable to anything nullable.
    Null,
    /// A user-declared enumerated type.
    Enum(&'ast str),
}

impl DataType<'_> {
    /// Whether values of this type support arithmetic negation.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int | DataType::Long | DataType::Float | DataType::Double
        )
    }
}

impl fmt::Display for DataType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => f.write_str("bool"),
            DataType::Char => f.write_str("char"),
            DataType::Int => f.write_str("int"),
            DataType::Long => f.write_str("long"),
            DataType::Float => f.write_str("float"),
            DataType::Double => f.write_str("double"),
            DataType::String => f.write_str("string"),
            DataType::Null => f.write_str("null"),
            DataType::Enum(name) => f.write_str(name),
        }
    }
}
