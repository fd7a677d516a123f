//! Instruction framing.
//!
//! An encoded instruction is the opcode byte, the operand payload laid out
//! per [`OpCode::operands`], and a trailing [`TERMINATOR`]:
//!
//! ```text
//! +--------+---------------------------+------+
//! | opcode | payload (per layout)      | 0xFF |
//! +--------+---------------------------+------+
//! ```
//!
//! Multi-byte numbers are big-endian. Text and tag lists carry a 4-byte
//! big-endian count followed by their elements. Text is Latin-1, one byte
//! per character.

use std::fmt;

use corvid_core::EncodingError;

use super::{OpCode, TypeTag};

/// The byte that ends every encoded instruction.
pub const TERMINATOR: u8 = 0xFF;

/// The shape of one operand in an opcode's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    U32,
    I32,
    I64,
    F32,
    F64,
    Text,
    Tag,
    TagList,
}

/// A decoded operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    U32(u32),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(String),
    Tag(TypeTag),
    TagList(Vec<TypeTag>),
}

impl Operand {
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::U32(_) => OperandKind::U32,
            Operand::I32(_) => OperandKind::I32,
            Operand::I64(_) => OperandKind::I64,
            Operand::F32(_) => OperandKind::F32,
            Operand::F64(_) => OperandKind::F64,
            Operand::Text(_) => OperandKind::Text,
            Operand::Tag(_) => OperandKind::Tag,
            Operand::TagList(_) => OperandKind::TagList,
        }
    }

    fn write(&self, out: &mut Vec<u8>) -> Result<(), EncodingError> {
        match self {
            Operand::U32(v) => out.extend_from_slice(&v.to_be_bytes()),
            Operand::I32(v) => out.extend_from_slice(&v.to_be_bytes()),
            Operand::I64(v) => out.extend_from_slice(&v.to_be_bytes()),
            Operand::F32(v) => out.extend_from_slice(&v.to_be_bytes()),
            Operand::F64(v) => out.extend_from_slice(&v.to_be_bytes()),
            Operand::Text(s) => write_text(s, out)?,
            Operand::Tag(tag) => tag.write(out),
            Operand::TagList(tags) => {
                out.extend_from_slice(&length_prefix(tags.len())?);
                for tag in tags {
                    tag.write(out);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::U32(v) => write!(f, "{v}"),
            Operand::I32(v) => write!(f, "{v}"),
            Operand::I64(v) => write!(f, "{v}L"),
            Operand::F32(v) => write!(f, "{v:?}f"),
            Operand::F64(v) => write!(f, "{v:?}"),
            Operand::Text(s) => write!(f, "{s:?}"),
            Operand::Tag(tag) => write!(f, "{tag}"),
            Operand::TagList(tags) => {
                f.write_str("[")?;
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{tag}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Append `text` as a length-prefixed Latin-1 string.
///
/// Fails on the first character above U+00FF.
pub fn write_text(text: &str, out: &mut Vec<u8>) -> Result<(), EncodingError> {
    let start = out.len();
    out.extend_from_slice(&[0; 4]);
    let mut count = 0usize;
    for ch in text.chars() {
        let byte = u8::try_from(u32::from(ch))
            .map_err(|_| EncodingError::UnrepresentableChar { ch })?;
        out.push(byte);
        count += 1;
    }
    out[start..start + 4].copy_from_slice(&length_prefix(count)?);
    Ok(())
}

fn length_prefix(len: usize) -> Result<[u8; 4], EncodingError> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| EncodingError::LengthOverflow(len))
}

/// Cursor over an instruction payload, checking each read against the
/// remaining bytes.
struct PayloadReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    opcode: u8,
}

impl<'a> PayloadReader<'a> {
    fn new(bytes: &'a [u8], opcode: u8) -> Self {
        Self {
            bytes,
            pos: 0,
            opcode,
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], EncodingError> {
        let available = self.bytes.len().saturating_sub(self.pos);
        if available < N {
            return Err(EncodingError::UnexpectedEof {
                opcode: self.opcode,
                needed: N - available,
            });
        }
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        Ok(buf)
    }

    fn count(&mut self) -> Result<usize, EncodingError> {
        let raw = u32::from_be_bytes(self.take()?);
        usize::try_from(raw).map_err(|_| EncodingError::LengthOverflow(usize::MAX))
    }

    fn tag(&mut self) -> Result<TypeTag, EncodingError> {
        let (tag, used) = TypeTag::read(&self.bytes[self.pos.min(self.bytes.len())..], self.opcode)?;
        self.pos += used;
        Ok(tag)
    }

    fn operand(&mut self, kind: OperandKind) -> Result<Operand, EncodingError> {
        Ok(match kind {
            OperandKind::U32 => Operand::U32(u32::from_be_bytes(self.take()?)),
            OperandKind::I32 => Operand::I32(i32::from_be_bytes(self.take()?)),
            OperandKind::I64 => Operand::I64(i64::from_be_bytes(self.take()?)),
            OperandKind::F32 => Operand::F32(f32::from_be_bytes(self.take()?)),
            OperandKind::F64 => Operand::F64(f64::from_be_bytes(self.take()?)),
            OperandKind::Text => {
                let len = self.count()?;
                let available = self.bytes.len().saturating_sub(self.pos);
                if available < len {
                    return Err(EncodingError::UnexpectedEof {
                        opcode: self.opcode,
                        needed: len - available,
                    });
                }
                let text = self.bytes[self.pos..self.pos + len]
                    .iter()
                    .map(|&b| char::from(b))
                    .collect();
                self.pos += len;
                Operand::Text(text)
            }
            OperandKind::Tag => Operand::Tag(self.tag()?),
            OperandKind::TagList => {
                let len = self.count()?;
                let mut tags = Vec::with_capacity(len.min(64));
                for _ in 0..len {
                    tags.push(self.tag()?);
                }
                Operand::TagList(tags)
            }
        })
    }

    fn operands(&mut self, op: OpCode) -> Result<Vec<Operand>, EncodingError> {
        op.operands()
            .iter()
            .map(|&kind| self.operand(kind))
            .collect()
    }
}

/// A single encoded instruction: opcode plus operand payload.
///
/// The payload always matches the opcode's operand layout; the terminator is
/// added on serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    op: OpCode,
    payload: Vec<u8>,
}

impl Instruction {
    /// Build an instruction from a raw payload, validating it against the
    /// opcode's operand layout.
    pub fn encode(op: OpCode, payload: Vec<u8>) -> Result<Self, EncodingError> {
        let mut reader = PayloadReader::new(&payload, op.into());
        reader.operands(op)?;
        if reader.pos != payload.len() {
            return Err(EncodingError::TrailingPayload {
                opcode: op.into(),
                extra: payload.len() - reader.pos,
            });
        }
        Ok(Self { op, payload })
    }

    /// Build an instruction from typed operands.
    pub fn new(op: OpCode, operands: &[Operand]) -> Result<Self, EncodingError> {
        let layout = op.operands();
        if operands.len() != layout.len() {
            return Err(EncodingError::OperandMismatch {
                opcode: op.into(),
                index: operands.len().min(layout.len()),
            });
        }
        let mut payload = Vec::new();
        for (index, (operand, &kind)) in operands.iter().zip(layout).enumerate() {
            if operand.kind() != kind {
                return Err(EncodingError::OperandMismatch {
                    opcode: op.into(),
                    index,
                });
            }
            operand.write(&mut payload)?;
        }
        Ok(Self { op, payload })
    }

    /// An instruction whose payload the caller already laid out correctly.
    pub(crate) fn from_parts(op: OpCode, payload: Vec<u8>) -> Self {
        debug_assert!(Self::encode(op, payload.clone()).is_ok(), "bad payload for {op:?}");
        Self { op, payload }
    }

    /// An instruction without operands.
    pub(crate) fn bare(op: OpCode) -> Self {
        debug_assert!(op.operands().is_empty(), "{op:?} takes operands");
        Self {
            op,
            payload: Vec::new(),
        }
    }

    pub fn op(&self) -> OpCode {
        self.op
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Size in bytes once serialized, including opcode and terminator.
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + 2
    }

    /// Append this instruction's bytes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.op.into());
        out.extend_from_slice(&self.payload);
        out.push(TERMINATOR);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    /// Decode the instruction at the front of `bytes`.
    ///
    /// Returns the instruction and the number of bytes it occupied.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), EncodingError> {
        let (&byte, rest) = bytes.split_first().ok_or(EncodingError::Empty)?;
        let op = OpCode::from_u8(byte).ok_or(EncodingError::UnknownOpcode(byte))?;

        let mut reader = PayloadReader::new(rest, byte);
        reader.operands(op)?;
        let len = reader.pos;

        match rest.get(len) {
            Some(&TERMINATOR) => {}
            Some(&found) => {
                return Err(EncodingError::MissingTerminator {
                    opcode: byte,
                    found,
                });
            }
            None => {
                return Err(EncodingError::UnexpectedEof {
                    opcode: byte,
                    needed: 1,
                });
            }
        }

        let instruction = Self {
            op,
            payload: rest[..len].to_vec(),
        };
        Ok((instruction, len + 2))
    }

    /// Decode the payload back into typed operands.
    pub fn operands(&self) -> Result<Vec<Operand>, EncodingError> {
        PayloadReader::new(&self.payload, self.op.into()).operands(self.op)
    }

    /// The `index`-th 4-byte operand, for opcodes whose leading operands
    /// are all `U32`.
    fn u32_at(&self, index: usize) -> Option<u32> {
        self.payload
            .get(index * 4..index * 4 + 4)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_be_bytes)
    }

    /// The target of a `JUMP` / `JUMP_IF`.
    pub fn jump_target(&self) -> Option<u32> {
        if self.op.is_jump() {
            self.u32_at(0)
        } else {
            None
        }
    }

    /// Net change in stack depth when this instruction executes.
    ///
    /// | Instructions                               | Effect     |
    /// |--------------------------------------------|------------|
    /// | literal pushes, `PUSH_ADDRESS`             | +1         |
    /// | `DEREF_*`, `NOT`, `BIT_NOT`, `JUMP`        | 0          |
    /// | `MUTATE_*`                                 | -2         |
    /// | `MUTATE_*_KEEP`, binary operators, `JUMP_IF`, `RETURN`, `DEFINE_GLOBAL` | -1 |
    /// | `POP n`                                    | -n         |
    /// | `CALL id, argc`                            | 1 - argc   |
    /// | other declaration markers                  | 0          |
    pub fn stack_effect(&self) -> i64 {
        match self.op {
            OpCode::PushBool
            | OpCode::PushChar
            | OpCode::PushInt
            | OpCode::PushLong
            | OpCode::PushFloat
            | OpCode::PushDouble
            | OpCode::PushString
            | OpCode::PushNull
            | OpCode::PushDefault
            | OpCode::PushEnumMember
            | OpCode::PushAddress => 1,

            OpCode::DerefAbsolute | OpCode::DerefRelative => 0,
            OpCode::MutateAbsolute | OpCode::MutateRelative => -2,
            OpCode::MutateAbsoluteKeep | OpCode::MutateRelativeKeep => -1,
            OpCode::Pop => -i64::from(self.u32_at(0).unwrap_or(0)),

            OpCode::Add
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
            | OpCode::Or => -1,
            OpCode::Not | OpCode::BitNot => 0,

            OpCode::Jump => 0,
            OpCode::JumpIf => -1,
            OpCode::Call => 1 - i64::from(self.u32_at(1).unwrap_or(0)),
            OpCode::Return => -1,

            OpCode::DefineGlobal => -1,
            OpCode::DeclareGlobal
            | OpCode::EnumBegin
            | OpCode::EnumMember
            | OpCode::EnumEnd
            | OpCode::FunctionBegin
            | OpCode::Native
            | OpCode::FunctionEnd
            | OpCode::Entry => 0,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op.name())?;
        match self.operands() {
            Ok(operands) => {
                for (i, operand) in operands.iter().enumerate() {
                    f.write_str(if i == 0 { " " } else { ", " })?;
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
            Err(_) => write!(f, " <{} bytes>", self.payload.len()),
        }
    }
}
