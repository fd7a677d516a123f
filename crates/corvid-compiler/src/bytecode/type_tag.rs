//! Datatype tags as they appear in operands.

use std::fmt;

use corvid_core::EncodingError;

use crate::ids::EnumId;

/// The kind byte of an enum tag; followed by a 4-byte enum id.
pub const ENUM_TAG_CODE: u8 = 0x09;

/// A one-byte primitive kind, or the enum class plus its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
    /// Denotes "any nullable" and matches every other tag.
    Null,
    Enum(EnumId),
}

impl TypeTag {
    /// The kind byte that starts this tag's encoding.
    pub fn code(&self) -> u8 {
        match self {
            TypeTag::Bool => 0x01,
            TypeTag::Char => 0x02,
            TypeTag::Int => 0x03,
            TypeTag::Long => 0x04,
            TypeTag::Float => 0x05,
            TypeTag::Double => 0x06,
            TypeTag::String => 0x07,
            TypeTag::Null => 0x08,
            TypeTag::Enum(_) => ENUM_TAG_CODE,
        }
    }

    /// Tag equality for signature matching.
    ///
    /// Primitives match by code, enums by id, and `Null` matches anything.
    pub fn matches(&self, other: &TypeTag) -> bool {
        match (self, other) {
            (TypeTag::Null, _) | (_, TypeTag::Null) => true,
            (TypeTag::Enum(a), TypeTag::Enum(b)) => a == b,
            (a, b) => a.code() == b.code(),
        }
    }

    /// Number of bytes this tag occupies when encoded.
    pub fn encoded_len(&self) -> usize {
        match self {
            TypeTag::Enum(_) => 5,
            _ => 1,
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(self.code());
        if let TypeTag::Enum(id) = self {
            out.extend_from_slice(&id.index().to_be_bytes());
        }
    }

    /// Read one tag from the front of `bytes`, returning it and the number
    /// of bytes consumed. `opcode` is the instruction being decoded, for
    /// error reporting.
    pub fn read(bytes: &[u8], opcode: u8) -> Result<(TypeTag, usize), EncodingError> {
        let Some(&code) = bytes.first() else {
            return Err(EncodingError::UnexpectedEof { opcode, needed: 1 });
        };
        let tag = match code {
            0x01 => TypeTag::Bool,
            0x02 => TypeTag::Char,
            0x03 => TypeTag::Int,
            0x04 => TypeTag::Long,
            0x05 => TypeTag::Float,
            0x06 => TypeTag::Double,
            0x07 => TypeTag::String,
            0x08 => TypeTag::Null,
            ENUM_TAG_CODE => {
                let id: [u8; 4] = bytes
                    .get(1..5)
                    .and_then(|b| b.try_into().ok())
                    .ok_or_else(|| EncodingError::UnexpectedEof {
                        opcode,
                        needed: 5 - bytes.len(),
                    })?;
                return Ok((TypeTag::Enum(EnumId::new(u32::from_be_bytes(id))), 5));
            }
            other => return Err(EncodingError::UnknownTypeTag(other)),
        };
        Ok((tag, 1))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::Char => f.write_str("char"),
            TypeTag::Int => f.write_str("int"),
            TypeTag::Long => f.write_str("long"),
            TypeTag::Float => f.write_str("float"),
            TypeTag::Double => f.write_str("double"),
            TypeTag::String => f.write_str("string"),
            TypeTag::Null => f.write_str("null"),
            TypeTag::Enum(id) => write!(f, "{id}"),
        }
    }
}
