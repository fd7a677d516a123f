//! Numeric identifiers assigned by the symbol tables.
//!
//! Each is a thin `u32` newtype. Addresses, ids and slots are what the
//! bytecode carries in place of names.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Get the underlying index.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self::new(index)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Absolute storage address of a global variable. Program-lifetime.
    GlobalAddress,
    "@"
);

define_id!(
    /// Frame-relative slot of a local variable.
    LocalSlot,
    "%"
);

define_id!(
    /// Dense call target, one per distinct function signature.
    FunctionId,
    "fn#"
);

define_id!(
    /// Dense identifier of an enumerated type.
    EnumId,
    "enum#"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_through_u32() {
        let id = FunctionId::from(7);
        assert_eq!(id.index(), 7);
        assert_eq!(u32::from(id), 7);
    }

    #[test]
    fn id_display() {
        assert_eq!(GlobalAddress::new(3).to_string(), "@3");
        assert_eq!(LocalSlot::new(0).to_string(), "%0");
        assert_eq!(EnumId::new(2).to_string(), "enum#2");
    }
}
