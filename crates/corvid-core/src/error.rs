//! Unified error types for Corvid.
//!
//! ## Error Hierarchy
//!
//! ```text
//! CorvidError (top-level wrapper)
//! ├── EncodingError     - Instruction and bytecode file framing errors
//! └── CompilationError  - Address/id resolution and control-flow placement errors
//! ```
//!
//! `CompilationError` is the only failure a well-typed tree can produce.
//! `CompilationError::Internal` marks a broken back-end invariant rather than
//! a problem with the user's program; use [`CompilationError::is_internal`]
//! to tell the two apart.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Encoding Errors
// ============================================================================

/// Errors raised while building, serializing or reading instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Decoding was attempted on an empty byte stream.
    #[error("cannot decode an instruction from an empty stream")]
    Empty,

    /// A tag byte does not name any opcode.
    #[error("unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),

    /// The stream ended in the middle of an instruction.
    #[error("unexpected end of stream in opcode 0x{opcode:02x}: needed {needed} more byte(s)")]
    UnexpectedEof { opcode: u8, needed: usize },

    /// The byte after an instruction's payload is not the terminator sentinel.
    #[error("opcode 0x{opcode:02x} is not terminated (found 0x{found:02x})")]
    MissingTerminator { opcode: u8, found: u8 },

    /// A raw payload is longer than the opcode's operand layout allows.
    #[error("payload for opcode 0x{opcode:02x} has {extra} trailing byte(s)")]
    TrailingPayload { opcode: u8, extra: usize },

    /// A typed operand does not fit the opcode's operand layout.
    #[error("operand {index} of opcode 0x{opcode:02x} has the wrong kind")]
    OperandMismatch { opcode: u8, index: usize },

    /// A type tag byte does not name a primitive kind or the enum class.
    #[error("unknown type tag 0x{0:02x}")]
    UnknownTypeTag(u8),

    /// A character cannot be stored in a single Latin-1 byte.
    #[error("character {ch:?} is outside the Latin-1 range")]
    UnrepresentableChar { ch: char },

    /// A text or list operand is longer than a 4-byte count can describe.
    #[error("operand length {0} exceeds the 4-byte length prefix")]
    LengthOverflow(usize),

    /// A bytecode file is shorter than its header.
    #[error("bytecode file truncated: header needs 6 bytes, got {0}")]
    TruncatedHeader(usize),

    /// The header's reserved padding bytes are wrong.
    #[error("bytecode header padding is corrupt")]
    BadPadding,

    /// The header's magic marker is wrong.
    #[error("bad magic marker {0:02x?}")]
    BadMagic([u8; 2]),

    /// The header names a format version this reader does not understand.
    #[error("unsupported bytecode format version {0}")]
    UnsupportedVersion(u8),
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors that occur while lowering a typed tree to bytecode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A variable reference did not resolve to a local slot or global address.
    #[error("at {span}: unknown variable '{name}'")]
    UnknownVariable {
        /// The fully qualified variable name.
        name: String,
        /// Where the variable was referenced.
        span: Span,
    },

    /// No registered function matches the call's name and argument types.
    #[error("at {span}: unknown function '{name}'")]
    UnknownFunction {
        /// The fully qualified function name.
        name: String,
        /// Where the function was called.
        span: Span,
    },

    /// A referenced enumerated type was never registered.
    #[error("at {span}: unknown enum '{name}'")]
    UnknownEnum {
        /// The fully qualified enum name.
        name: String,
        /// Where the enum was referenced.
        span: Span,
    },

    /// The enum exists but has no member with this name.
    #[error("at {span}: enum '{enum_name}' has no member '{member}'")]
    UnknownEnumMember {
        /// The enum that was searched.
        enum_name: String,
        /// The missing member.
        member: String,
        /// Where the member was referenced.
        span: Span,
    },

    /// A global, function signature or enum was declared twice.
    #[error("at {span}: duplicate {kind} '{name}'")]
    DuplicateSymbol {
        /// What was duplicated ("global", "function", "enum").
        kind: &'static str,
        /// The duplicated name.
        name: String,
        /// Where the second declaration occurred.
        span: Span,
    },

    /// `break` or `continue` appeared outside every loop.
    #[error("at {span}: '{keyword}' outside of a loop")]
    UnboundLoopControl {
        /// The offending keyword.
        keyword: &'static str,
        /// Where it appeared.
        span: Span,
    },

    /// The designated entry function does not exist.
    #[error("no nullary script function '{name}' to use as the entry point")]
    MissingEntryPoint {
        /// The qualified name that was searched for.
        name: String,
    },

    /// A literal or name could not be encoded.
    #[error("at {span}: {source}")]
    Encoding {
        #[source]
        source: EncodingError,
        /// Where the unencodable value appeared.
        span: Span,
    },

    /// A back-end invariant was broken. Never caused by user input.
    #[error("internal compiler error: {message}")]
    Internal {
        /// Description of the broken invariant.
        message: String,
    },
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::UnknownVariable { span, .. } => *span,
            CompilationError::UnknownFunction { span, .. } => *span,
            CompilationError::UnknownEnum { span, .. } => *span,
            CompilationError::UnknownEnumMember { span, .. } => *span,
            CompilationError::DuplicateSymbol { span, .. } => *span,
            CompilationError::UnboundLoopControl { span, .. } => *span,
            CompilationError::Encoding { span, .. } => *span,
            CompilationError::MissingEntryPoint { .. } => Span::default(),
            CompilationError::Internal { .. } => Span::default(),
        }
    }

    /// Whether this error signals a back-end defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, CompilationError::Internal { .. })
    }

    /// Build an [`CompilationError::Internal`] from a message.
    pub fn internal(message: impl Into<String>) -> Self {
        CompilationError::Internal {
            message: message.into(),
        }
    }
}

// ============================================================================
// Top-level Error
// ============================================================================

/// The unified error type for all Corvid back-end operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorvidError {
    /// A framing or reader error.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A compilation error.
    #[error(transparent)]
    Compilation(#[from] CompilationError),
}

impl CorvidError {
    /// Check if this is an encoding error.
    pub fn is_encoding(&self) -> bool {
        matches!(self, CorvidError::Encoding(_))
    }

    /// Check if this is a compilation error.
    pub fn is_compilation(&self) -> bool {
        matches!(self, CorvidError::Compilation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compilation_error_display() {
        let err = CompilationError::UnknownFunction {
            name: "math::sqrt".to_string(),
            span: Span::new(10, 5, 4),
        };
        assert_eq!(format!("{err}"), "at 10:5: unknown function 'math::sqrt'");
    }

    #[test]
    fn compilation_error_span() {
        let span = Span::new(5, 10, 8);
        let err = CompilationError::UnboundLoopControl {
            keyword: "break",
            span,
        };
        assert_eq!(err.span(), span);
        assert_eq!(format!("{err}"), "at 5:10: 'break' outside of a loop");
    }

    #[test]
    fn internal_errors_are_flagged() {
        let err = CompilationError::internal("label 3 bound twice");
        assert!(err.is_internal());
        assert_eq!(err.span(), Span::default());

        let user = CompilationError::MissingEntryPoint {
            name: "main::main".to_string(),
        };
        assert!(!user.is_internal());
    }

    #[test]
    fn encoding_error_display() {
        let err = EncodingError::UnrepresentableChar { ch: 'λ' };
        assert_eq!(
            format!("{err}"),
            "character 'λ' is outside the Latin-1 range"
        );
        assert_eq!(
            format!("{}", EncodingError::UnknownOpcode(0xab)),
            "unknown opcode 0xab"
        );
    }

    #[test]
    fn encoding_inside_compilation_keeps_span() {
        let err = CompilationError::Encoding {
            source: EncodingError::UnrepresentableChar { ch: '€' },
            span: Span::new(2, 9, 3),
        };
        assert_eq!(err.span(), Span::new(2, 9, 3));
        assert!(format!("{err}").starts_with("at 2:9: character"));
    }

    #[test]
    fn corvid_error_from_variants() {
        let err: CorvidError = EncodingError::BadPadding.into();
        assert!(err.is_encoding());

        let err: CorvidError = CompilationError::internal("oops").into();
        assert!(err.is_compilation());
        assert_eq!(format!("{err}"), "internal compiler error: oops");
    }
}
