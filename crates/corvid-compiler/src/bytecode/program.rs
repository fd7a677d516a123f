//! Bytecode file layout and the reference reader.
//!
//! A file is a 6-byte header followed by instructions back to back:
//!
//! ```text
//! FF 00 FF  'C' 'V'  version  | instruction | instruction | ...
//! ```
//!
//! There is no length table; readers walk the stream one instruction at a
//! time using the terminator framing.

use std::fmt::Write as _;

use corvid_core::EncodingError;

use super::Instruction;

/// Reserved bytes at the start of every file, identical across versions.
pub const HEADER_PADDING: [u8; 3] = [0xFF, 0x00, 0xFF];
/// Marker identifying the format family.
pub const MAGIC: [u8; 2] = *b"CV";
/// Format version written by this compiler.
pub const FORMAT_VERSION: u8 = 1;
/// Total header size in bytes.
pub const HEADER_LEN: usize = 6;

/// Build the 6-byte header for a format version.
pub fn header(version: u8) -> [u8; HEADER_LEN] {
    let [p0, p1, p2] = HEADER_PADDING;
    let [m0, m1] = MAGIC;
    [p0, p1, p2, m0, m1, version]
}

/// A complete bytecode program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub version: u8,
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            version: FORMAT_VERSION,
            instructions,
        }
    }

    /// Serialize the header and every instruction.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body: usize = self.instructions.iter().map(Instruction::encoded_len).sum();
        let mut out = Vec::with_capacity(HEADER_LEN + body);
        out.extend_from_slice(&header(self.version));
        for inst in &self.instructions {
            inst.write_to(&mut out);
        }
        out
    }

    /// Read a file produced by [`Program::to_bytes`].
    pub fn parse(bytes: &[u8]) -> Result<Self, EncodingError> {
        let version = read_header(bytes)?;
        let instructions = read_instructions(&bytes[HEADER_LEN..])?;
        Ok(Self {
            version,
            instructions,
        })
    }

    /// A listing with one `index  NAME operands` line per instruction.
    ///
    /// Indices count from zero within the whole program.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "; corvid bytecode v{}", self.version);
        for (i, inst) in self.instructions.iter().enumerate() {
            let _ = writeln!(out, "{i:>5}  {inst}");
        }
        out
    }
}

/// Validate the header and return the format version.
pub fn read_header(bytes: &[u8]) -> Result<u8, EncodingError> {
    if bytes.len() < HEADER_LEN {
        return Err(EncodingError::TruncatedHeader(bytes.len()));
    }
    if bytes[..3] != HEADER_PADDING {
        return Err(EncodingError::BadPadding);
    }
    let magic = [bytes[3], bytes[4]];
    if magic != MAGIC {
        return Err(EncodingError::BadMagic(magic));
    }
    match bytes[5] {
        FORMAT_VERSION => Ok(FORMAT_VERSION),
        other => Err(EncodingError::UnsupportedVersion(other)),
    }
}

/// Decode a headerless instruction stream.
pub fn read_instructions(mut bytes: &[u8]) -> Result<Vec<Instruction>, EncodingError> {
    let mut instructions = Vec::new();
    while !bytes.is_empty() {
        let (inst, used) = Instruction::decode(bytes)?;
        instructions.push(inst);
        bytes = &bytes[used..];
    }
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{OpCode, Operand};

    fn sample() -> Program {
        Program::new(vec![
            Instruction::new(OpCode::PushInt, &[Operand::I32(7)]).unwrap(),
            Instruction::new(OpCode::PushString, &[Operand::Text("hi".into())]).unwrap(),
            Instruction::new(OpCode::Pop, &[Operand::U32(2)]).unwrap(),
        ])
    }

    #[test]
    fn header_layout() {
        assert_eq!(header(1), [0xFF, 0x00, 0xFF, b'C', b'V', 1]);
    }

    #[test]
    fn parse_round_trips() {
        let program = sample();
        let bytes = program.to_bytes();
        assert_eq!(&bytes[..HEADER_LEN], &header(FORMAT_VERSION));
        assert_eq!(Program::parse(&bytes).unwrap(), program);
    }

    #[test]
    fn header_errors() {
        assert_eq!(
            Program::parse(&[0xFF, 0x00]),
            Err(EncodingError::TruncatedHeader(2))
        );
        assert_eq!(
            Program::parse(&[0x00, 0x00, 0xFF, b'C', b'V', 1]),
            Err(EncodingError::BadPadding)
        );
        assert_eq!(
            Program::parse(&[0xFF, 0x00, 0xFF, b'J', b'V', 1]),
            Err(EncodingError::BadMagic(*b"JV"))
        );
        assert_eq!(
            Program::parse(&header(9)),
            Err(EncodingError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let mut bytes = sample().to_bytes();
        bytes.pop();
        assert!(matches!(
            Program::parse(&bytes),
            Err(EncodingError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn disassembly_lists_each_instruction() {
        let listing = sample().disassemble();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "; corvid bytecode v1");
        assert_eq!(lines[1], "    0  PUSH_INT 7");
        assert_eq!(lines[2], "    1  PUSH_STRING \"hi\"");
        assert_eq!(lines[3], "    2  POP 2");
    }
}
