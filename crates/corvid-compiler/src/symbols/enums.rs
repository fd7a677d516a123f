//! Enumerated types and member ordinals.

use corvid_core::{CompilationError, Span};
use rustc_hash::FxHashMap;

use crate::ids::EnumId;

/// A registered enum with members in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub id: EnumId,
    pub name: String,
    pub members: Vec<String>,
}

impl EnumEntry {
    pub fn ordinal(&self, member: &str) -> Option<u32> {
        self.members
            .iter()
            .position(|m| m == member)
            .map(|i| i as u32)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    entries: Vec<EnumEntry>,
    by_name: FxHashMap<String, EnumId>,
}

impl EnumTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        members: &[&str],
        span: Span,
    ) -> Result<EnumId, CompilationError> {
        if self.by_name.contains_key(name) {
            return Err(CompilationError::DuplicateSymbol {
                kind: "enum",
                name: name.to_string(),
                span,
            });
        }
        let id = EnumId::new(self.entries.len() as u32);
        self.entries.push(EnumEntry {
            id,
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn resolve(&self, name: &str) -> Option<EnumId> {
        self.by_name.get(name).copied()
    }

    /// Encode a member as `(enum id, ordinal)`.
    pub fn member(
        &self,
        enum_name: &str,
        member: &str,
        span: Span,
    ) -> Result<(EnumId, u32), CompilationError> {
        let entry = self
            .resolve(enum_name)
            .and_then(|id| self.get(id))
            .ok_or_else(|| CompilationError::UnknownEnum {
                name: enum_name.to_string(),
                span,
            })?;
        let ordinal = entry
            .ordinal(member)
            .ok_or_else(|| CompilationError::UnknownEnumMember {
                enum_name: enum_name.to_string(),
                member: member.to_string(),
                span,
            })?;
        Ok((entry.id, ordinal))
    }

    pub fn get(&self, id: EnumId) -> Option<&EnumEntry> {
        self.entries.get(id.index() as usize)
    }

    /// All enums in id order.
    pub fn iter(&self) -> impl Iterator<Item = &EnumEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_encoding_ignores_other_enums() {
        let mut enums = EnumTable::new();
        for name in ["a::A", "a::B", "a::C"] {
            enums.register(name, &["X"], Span::default()).unwrap();
        }
        let id = enums
            .register("gfx::Color", &["Red", "Green", "Blue"], Span::default())
            .unwrap();
        assert_eq!(id, EnumId::new(3));
        assert_eq!(
            enums.member("gfx::Color", "Green", Span::default()),
            Ok((EnumId::new(3), 1))
        );
    }

    #[test]
    fn unknown_enum_and_member() {
        let mut enums = EnumTable::new();
        enums.register("Color", &["Red"], Span::default()).unwrap();

        let err = enums.member("Shade", "Red", Span::new(2, 3, 5)).unwrap_err();
        assert!(matches!(err, CompilationError::UnknownEnum { ref name, .. } if name == "Shade"));

        let err = enums.member("Color", "Mauve", Span::new(2, 3, 5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "at 2:3: enum 'Color' has no member 'Mauve'"
        );
    }

    #[test]
    fn duplicate_enum() {
        let mut enums = EnumTable::new();
        enums.register("Color", &[], Span::default()).unwrap();
        assert!(enums.register("Color", &["Red"], Span::default()).is_err());
        assert_eq!(enums.len(), 1);
    }
}
