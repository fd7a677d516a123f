//! Literal and enum member compilation.

use corvid_core::ast::{EnumMemberExpr, LiteralExpr, LiteralKind};
use corvid_core::{CompilationError, DataType, Span};

use super::{ExprCompiler, Result, encoding_error};
use crate::emit::BytecodeEmitter;

/// Compile a literal as a single typed push.
pub fn compile_literal(compiler: &mut ExprCompiler<'_>, lit: &LiteralExpr<'_>) -> Result<()> {
    let emitter = compiler.emitter();
    match lit.kind {
        LiteralKind::Bool(value) => emitter.emit_bool(value),
        LiteralKind::Char(value) => emitter.emit_char(value).map_err(encoding_error(lit.span))?,
        LiteralKind::Int(value) => emitter.emit_int(value),
        LiteralKind::Long(value) => emitter.emit_long(value),
        LiteralKind::Float(value) => emitter.emit_float(value),
        LiteralKind::Double(value) => emitter.emit_double(value),
        LiteralKind::String(value) => emitter
            .emit_string(value)
            .map_err(encoding_error(lit.span))?,
        LiteralKind::Null => emitter.emit_null(),
    }
    Ok(())
}

/// Compile `Enum::Member` as one push of `(enum id, ordinal)`.
pub fn compile_enum_member(
    compiler: &mut ExprCompiler<'_>,
    member: &EnumMemberExpr<'_>,
) -> Result<()> {
    let (id, ordinal) =
        compiler
            .ctx()
            .tables()
            .enums
            .member(member.enum_name, member.member, member.span)?;
    compiler.emitter().emit_enum_member(id, ordinal);
    Ok(())
}

/// Push a small constant in the representation of `ty`, for negation and
/// increments.
pub fn emit_small_constant(
    emitter: &mut BytecodeEmitter,
    ty: DataType<'_>,
    value: i8,
    span: Span,
) -> Result<()> {
    match ty {
        DataType::Int => emitter.emit_int(value.into()),
        DataType::Long => emitter.emit_long(value.into()),
        DataType::Float => emitter.emit_float(value.into()),
        DataType::Double => emitter.emit_double(value.into()),
        DataType::Char => {
            let ch = char::from(value as u8);
            emitter.emit_char(ch).map_err(encoding_error(span))?;
        }
        other => {
            return Err(CompilationError::internal(format!(
                "no arithmetic constant of type {other} at {span}"
            )));
        }
    }
    Ok(())
}
