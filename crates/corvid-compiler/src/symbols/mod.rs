//! Symbol & type tables.
//!
//! Per-compilation registries mapping names to what the bytecode carries
//! instead:
//!
//! - [`GlobalTable`]: qualified global name to absolute address
//! - [`LocalScope`]: local name to frame-relative slot
//! - [`FunctionTable`]: signature to dense function id
//! - [`EnumTable`]: enum name to enum id plus member ordinals
//!
//! Everything is assigned before any instruction that references it is
//! emitted.

mod enums;
mod functions;
mod globals;
mod scope;

pub use enums::{EnumEntry, EnumTable};
pub use functions::{FunctionEntry, FunctionKind, FunctionTable};
pub use globals::GlobalTable;
pub use scope::{LocalScope, LocalVar};

use corvid_core::{CompilationError, DataType, Span};

use crate::bytecode::TypeTag;
use crate::ids::{GlobalAddress, LocalSlot};

/// Result of variable lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarLookup {
    Global(GlobalAddress),
    Local(LocalSlot),
    NotFound,
}

/// All tables for one compilation.
///
/// `locals` belongs to the frame currently being emitted; the others live
/// for the whole compilation.
#[derive(Debug, Clone, Default)]
pub struct SymbolTables {
    pub globals: GlobalTable,
    pub functions: FunctionTable,
    pub enums: EnumTable,
    pub locals: LocalScope,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a variable. Locals shadow globals of the same name.
    pub fn resolve(&self, name: &str) -> VarLookup {
        if let Some(var) = self.locals.get(name) {
            VarLookup::Local(var.slot)
        } else if let Some(address) = self.globals.get(name) {
            VarLookup::Global(address)
        } else {
            VarLookup::NotFound
        }
    }

    /// Start a fresh frame, returning the one it replaces.
    pub fn begin_frame(&mut self) -> LocalScope {
        std::mem::take(&mut self.locals)
    }

    /// Restore the frame saved by [`begin_frame`](Self::begin_frame).
    pub fn end_frame(&mut self, previous: LocalScope) -> LocalScope {
        std::mem::replace(&mut self.locals, previous)
    }

    /// Convert a resolved type into its tag, looking up enum ids.
    pub fn type_tag(&self, ty: &DataType<'_>, span: Span) -> Result<TypeTag, CompilationError> {
        Ok(match ty {
            DataType::Bool => TypeTag::Bool,
            DataType::Char => TypeTag::Char,
            DataType::Int => TypeTag::Int,
            DataType::Long => TypeTag::Long,
            DataType::Float => TypeTag::Float,
            DataType::Double => TypeTag::Double,
            DataType::String => TypeTag::String,
            DataType::Null => TypeTag::Null,
            DataType::Enum(name) => {
                let id = self
                    .enums
                    .resolve(name)
                    .ok_or_else(|| CompilationError::UnknownEnum {
                        name: name.to_string(),
                        span,
                    })?;
                TypeTag::Enum(id)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EnumId;

    #[test]
    fn local_shadows_global() {
        let mut tables = SymbolTables::new();
        let address = tables.globals.declare("x", Span::default()).unwrap();
        assert_eq!(tables.resolve("x"), VarLookup::Global(address));

        tables.locals.enter_scope();
        let slot = tables.locals.declare("x", Span::default());
        assert_eq!(tables.resolve("x"), VarLookup::Local(slot));

        tables.locals.exit_scope().unwrap();
        assert_eq!(tables.resolve("x"), VarLookup::Global(address));
        assert_eq!(tables.resolve("y"), VarLookup::NotFound);
    }

    #[test]
    fn frames_are_isolated() {
        let mut tables = SymbolTables::new();
        tables.locals.declare("outer", Span::default());

        let saved = tables.begin_frame();
        assert_eq!(tables.resolve("outer"), VarLookup::NotFound);
        tables.locals.declare_param("p", Span::default());
        tables.end_frame(saved);

        assert_eq!(tables.resolve("outer"), VarLookup::Local(LocalSlot::new(0)));
        assert_eq!(tables.resolve("p"), VarLookup::NotFound);
    }

    #[test]
    fn enum_types_become_id_tags() {
        let mut tables = SymbolTables::new();
        tables.enums.register("a::E", &["X"], Span::default()).unwrap();
        assert_eq!(
            tables.type_tag(&DataType::Enum("a::E"), Span::default()),
            Ok(TypeTag::Enum(EnumId::new(0)))
        );
        assert!(tables.type_tag(&DataType::Enum("a::F"), Span::default()).is_err());
        assert_eq!(tables.type_tag(&DataType::Long, Span::default()), Ok(TypeTag::Long));
    }
}
