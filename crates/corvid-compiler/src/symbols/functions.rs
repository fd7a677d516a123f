//! Function signatures and their dense call ids.

use corvid_core::{CompilationError, Span};
use rustc_hash::FxHashMap;

use crate::bytecode::TypeTag;
use crate::ids::FunctionId;

/// Where a function's body comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Script,
    Native,
}

/// A registered function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub id: FunctionId,
    pub name: String,
    pub params: Vec<TypeTag>,
    pub kind: FunctionKind,
}

impl FunctionEntry {
    /// Whether a call with these argument tags can target this entry.
    pub fn accepts(&self, args: &[TypeTag]) -> bool {
        self.params.len() == args.len()
            && self.params.iter().zip(args).all(|(p, a)| p.matches(a))
    }
}

/// Signatures keyed by (qualified name, parameter tags).
///
/// Ids are dense, assigned in registration order.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    entries: Vec<FunctionEntry>,
    by_name: FxHashMap<String, Vec<FunctionId>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signature. Registering an identical signature twice is an
    /// error; overloads with different parameter tags get distinct ids.
    pub fn register(
        &mut self,
        name: &str,
        params: Vec<TypeTag>,
        kind: FunctionKind,
        span: Span,
    ) -> Result<FunctionId, CompilationError> {
        let overloads = self.by_name.entry(name.to_string()).or_default();
        if overloads
            .iter()
            .any(|id| self.entries[id.index() as usize].params == params)
        {
            return Err(CompilationError::DuplicateSymbol {
                kind: "function",
                name: name.to_string(),
                span,
            });
        }

        let id = FunctionId::new(self.entries.len() as u32);
        overloads.push(id);
        self.entries.push(FunctionEntry {
            id,
            name: name.to_string(),
            params,
            kind,
        });
        Ok(id)
    }

    /// Find the call target for `name` applied to arguments with these tags.
    ///
    /// An exact signature wins; otherwise the first registered overload whose
    /// parameters match under [`TypeTag::matches`].
    pub fn resolve(&self, name: &str, args: &[TypeTag]) -> Option<FunctionId> {
        let overloads = self.by_name.get(name)?;
        let candidates = || overloads.iter().map(|id| &self.entries[id.index() as usize]);
        candidates()
            .find(|f| f.params == args)
            .or_else(|| candidates().find(|f| f.accepts(args)))
            .map(|f| f.id)
    }

    /// Find a script function without parameters.
    pub fn find_entry_point(&self, name: &str) -> Option<FunctionId> {
        self.by_name
            .get(name)?
            .iter()
            .map(|id| &self.entries[id.index() as usize])
            .find(|f| f.params.is_empty() && f.kind == FunctionKind::Script)
            .map(|f| f.id)
    }

    pub fn get(&self, id: FunctionId) -> Option<&FunctionEntry> {
        self.entries.get(id.index() as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
