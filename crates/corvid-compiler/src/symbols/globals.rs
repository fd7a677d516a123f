//! Global variable addresses.

use corvid_core::{CompilationError, Span};
use rustc_hash::FxHashMap;

use crate::ids::GlobalAddress;

/// Qualified global names mapped to absolute addresses.
///
/// Addresses grow monotonically from zero and are never reused.
#[derive(Debug, Clone, Default)]
pub struct GlobalTable {
    addresses: FxHashMap<String, GlobalAddress>,
    next: u32,
}

impl GlobalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, span: Span) -> Result<GlobalAddress, CompilationError> {
        if self.addresses.contains_key(name) {
            return Err(CompilationError::DuplicateSymbol {
                kind: "global",
                name: name.to_string(),
                span,
            });
        }
        let address = GlobalAddress::new(self.next);
        self.next += 1;
        self.addresses.insert(name.to_string(), address);
        Ok(address)
    }

    pub fn get(&self, name: &str) -> Option<GlobalAddress> {
        self.addresses.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_monotonic() {
        let mut globals = GlobalTable::new();
        assert_eq!(globals.declare("a", Span::default()), Ok(GlobalAddress::new(0)));
        assert_eq!(globals.declare("m::b", Span::default()), Ok(GlobalAddress::new(1)));
        assert_eq!(globals.get("m::b"), Some(GlobalAddress::new(1)));
        assert_eq!(globals.get("b"), None);
    }

    #[test]
    fn duplicate_global() {
        let mut globals = GlobalTable::new();
        globals.declare("count", Span::default()).unwrap();
        let err = globals.declare("count", Span::new(4, 1, 5)).unwrap_err();
        assert!(matches!(
            err,
            CompilationError::DuplicateSymbol { kind: "global", .. }
        ));
        assert_eq!(globals.len(), 1);
    }
}
