//! Bytecode operation codes.
//!
//! This module defines the instruction set for the Corvid VM. Each opcode
//! is a single byte below `0x80`, followed by its operands and the
//! terminator sentinel.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::instruction::OperandKind;

use OperandKind::{F32, F64, I32, I64, Tag, TagList, Text, U32};

/// Bytecode operation codes.
///
/// The VM is a stack-based machine. Operators pop their operands from the
/// stack and push a single result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Push a boolean. Operand: i32 (0 or 1)
    PushBool = 0x00,
    /// Push a character. Operand: i32 code point
    PushChar,
    /// Push a 32-bit integer. Operand: i32
    PushInt,
    /// Push a 64-bit integer. Operand: i64
    PushLong,
    /// Push a 32-bit float. Operand: f32
    PushFloat,
    /// Push a 64-bit float. Operand: f64
    PushDouble,
    /// Push a string. Operand: text
    PushString,
    /// Push null.
    PushNull,
    /// Push the default value of a type. Operand: type tag
    PushDefault,
    /// Push an enum member. Operands: u32 enum id, u32 ordinal
    PushEnumMember,

    // =========================================================================
    // Storage
    // =========================================================================
    /// Push a global address or local slot. Operand: u32
    PushAddress = 0x10,
    /// Pop a global address, push the value stored there.
    DerefAbsolute,
    /// Pop a local slot, push the value stored there.
    DerefRelative,
    /// Pop a global address, pop a value, store it.
    MutateAbsolute,
    /// Pop a local slot, pop a value, store it.
    MutateRelative,
    /// Like `MutateAbsolute`, then push the stored value back.
    MutateAbsoluteKeep,
    /// Like `MutateRelative`, then push the stored value back.
    MutateRelativeKeep,
    /// Discard values. Operand: u32 count
    Pop,

    // =========================================================================
    // Operators
    // =========================================================================
    Add = 0x20,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Logical and. Both operands are already evaluated.
    And,
    /// Logical or. Both operands are already evaluated.
    Or,
    /// Logical not (single operand).
    Not,
    /// Bitwise complement (single operand).
    BitNot,

    // =========================================================================
    // Control flow
    // =========================================================================
    /// Unconditional jump. Operand: u32 target instruction index
    Jump = 0x40,
    /// Pop a bool, jump if it is true. Operand: u32 target instruction index
    JumpIf,
    /// Call a function. Operands: u32 function id, u32 argument count
    Call,
    /// Pop the return value and leave the current function.
    Return,

    // =========================================================================
    // Declarations
    // =========================================================================
    /// Reserve a global without an initializer. Operands: u32 address, type tag
    DeclareGlobal = 0x50,
    /// Pop the initializer into a new global. Operands: u32 address, type tag
    DefineGlobal,
    /// Open an enum definition. Operands: u32 enum id, text name
    EnumBegin,
    /// Define one enum member. Operands: u32 ordinal, text name
    EnumMember,
    /// Close an enum definition.
    EnumEnd,
    /// Open a function. Operands: u32 function id, text name, parameter tags
    FunctionBegin,
    /// Native function body. Operand: text host descriptor
    Native,
    /// Close a function.
    FunctionEnd,
    /// Designate the entry point. Operand: u32 function id
    Entry,
}

impl OpCode {
    /// Every defined opcode, in byte order.
    pub const ALL: &'static [OpCode] = &[
        OpCode::PushBool,
        OpCode::PushChar,
        OpCode::PushInt,
        OpCode::PushLong,
        OpCode::PushFloat,
        OpCode::PushDouble,
        OpCode::PushString,
        OpCode::PushNull,
        OpCode::PushDefault,
        OpCode::PushEnumMember,
        OpCode::PushAddress,
        OpCode::DerefAbsolute,
        OpCode::DerefRelative,
        OpCode::MutateAbsolute,
        OpCode::MutateRelative,
        OpCode::MutateAbsoluteKeep,
        OpCode::MutateRelativeKeep,
        OpCode::Pop,
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mul,
        OpCode::Div,
        OpCode::Mod,
        OpCode::BitAnd,
        OpCode::BitOr,
        OpCode::BitXor,
        OpCode::Shl,
        OpCode::Shr,
        OpCode::Eq,
        OpCode::Ne,
        OpCode::Lt,
        OpCode::Le,
        OpCode::Gt,
        OpCode::Ge,
        OpCode::And,
        OpCode::Or,
        OpCode::Not,
        OpCode::BitNot,
        OpCode::Jump,
        OpCode::JumpIf,
        OpCode::Call,
        OpCode::Return,
        OpCode::DeclareGlobal,
        OpCode::DefineGlobal,
        OpCode::EnumBegin,
        OpCode::EnumMember,
        OpCode::EnumEnd,
        OpCode::FunctionBegin,
        OpCode::Native,
        OpCode::FunctionEnd,
        OpCode::Entry,
    ];

    /// Convert from u8, returning None for invalid values.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// The operand layout that follows the opcode byte.
    pub fn operands(&self) -> &'static [OperandKind] {
        match self {
            OpCode::PushBool | OpCode::PushChar | OpCode::PushInt => &[I32],
            OpCode::PushLong => &[I64],
            OpCode::PushFloat => &[F32],
            OpCode::PushDouble => &[F64],
            OpCode::PushString => &[Text],
            OpCode::PushDefault => &[Tag],
            OpCode::PushEnumMember => &[U32, U32],

            OpCode::PushAddress | OpCode::Pop => &[U32],

            OpCode::Jump | OpCode::JumpIf | OpCode::Entry => &[U32],
            OpCode::Call => &[U32, U32],

            OpCode::DeclareGlobal | OpCode::DefineGlobal => &[U32, Tag],
            OpCode::EnumBegin | OpCode::EnumMember => &[U32, Text],
            OpCode::FunctionBegin => &[U32, Text, TagList],
            OpCode::Native => &[Text],

            OpCode::PushNull
            | OpCode::DerefAbsolute
            | OpCode::DerefRelative
            | OpCode::MutateAbsolute
            | OpCode::MutateRelative
            | OpCode::MutateAbsoluteKeep
            | OpCode::MutateRelativeKeep
            | OpCode::Add
            | OpCode::Sub
            | OpCode::Mul
            | OpCode::Div
            | OpCode::Mod
            | OpCode::BitAnd
            | OpCode::BitOr
            | OpCode::BitXor
            | OpCode::Shl
            | OpCode::Shr
            | OpCode::Eq
            | OpCode::Ne
            | OpCode::Lt
            | OpCode::Le
            | OpCode::Gt
            | OpCode::Ge
            | OpCode::And
            | OpCode::Or
            | OpCode::Not
            | OpCode::BitNot
            | OpCode::Return
            | OpCode::EnumEnd
            | OpCode::FunctionEnd => &[],
        }
    }

    /// Whether this opcode carries a jump target that the emitter resolves.
    pub fn is_jump(&self) -> bool {
        matches!(self, OpCode::Jump | OpCode::JumpIf)
    }

    /// Get the name of this opcode for debugging.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::PushBool => "PUSH_BOOL",
            OpCode::PushChar => "PUSH_CHAR",
            OpCode::PushInt => "PUSH_INT",
            OpCode::PushLong => "PUSH_LONG",
            OpCode::PushFloat => "PUSH_FLOAT",
            OpCode::PushDouble => "PUSH_DOUBLE",
            OpCode::PushString => "PUSH_STRING",
            OpCode::PushNull => "PUSH_NULL",
            OpCode::PushDefault => "PUSH_DEFAULT",
            OpCode::PushEnumMember => "PUSH_ENUM_MEMBER",
            OpCode::PushAddress => "PUSH_ADDRESS",
            OpCode::DerefAbsolute => "DEREF_ABSOLUTE",
            OpCode::DerefRelative => "DEREF_RELATIVE",
            OpCode::MutateAbsolute => "MUTATE_ABSOLUTE",
            OpCode::MutateRelative => "MUTATE_RELATIVE",
            OpCode::MutateAbsoluteKeep => "MUTATE_ABSOLUTE_KEEP",
            OpCode::MutateRelativeKeep => "MUTATE_RELATIVE_KEEP",
            OpCode::Pop => "POP",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Mod => "MOD",
            OpCode::BitAnd => "BIT_AND",
            OpCode::BitOr => "BIT_OR",
            OpCode::BitXor => "BIT_XOR",
            OpCode::Shl => "SHL",
            OpCode::Shr => "SHR",
            OpCode::Eq => "EQ",
            OpCode::Ne => "NE",
            OpCode::Lt => "LT",
            OpCode::Le => "LE",
            OpCode::Gt => "GT",
            OpCode::Ge => "GE",
            OpCode::And => "AND",
            OpCode::Or => "OR",
            OpCode::Not => "NOT",
            OpCode::BitNot => "BIT_NOT",
            OpCode::Jump => "JUMP",
            OpCode::JumpIf => "JUMP_IF",
            OpCode::Call => "CALL",
            OpCode::Return => "RETURN",
            OpCode::DeclareGlobal => "DECLARE_GLOBAL",
            OpCode::DefineGlobal => "DEFINE_GLOBAL",
            OpCode::EnumBegin => "ENUM_BEGIN",
            OpCode::EnumMember => "ENUM_MEMBER",
            OpCode::EnumEnd => "ENUM_END",
            OpCode::FunctionBegin => "FUNCTION_BEGIN",
            OpCode::Native => "NATIVE",
            OpCode::FunctionEnd => "FUNCTION_END",
            OpCode::Entry => "ENTRY",
        }
    }
}
