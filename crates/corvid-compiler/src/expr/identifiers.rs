//! Identifier resolution and loads.
//!
//! Every variable access has the same two-instruction shape: the storage
//! address, then a dereference matching where the variable lives. Writes
//! reuse the address half of that shape.

use corvid_core::CompilationError;
use corvid_core::ast::IdentExpr;

use super::{ExprCompiler, Result};
use crate::bytecode::OpCode;
use crate::ids::{GlobalAddress, LocalSlot};
use crate::symbols::VarLookup;

/// Where a resolved variable is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Global(GlobalAddress),
    Local(LocalSlot),
}

impl Storage {
    /// The operand of `PUSH_ADDRESS`.
    pub fn address(self) -> u32 {
        match self {
            Storage::Global(address) => address.index(),
            Storage::Local(slot) => slot.index(),
        }
    }

    pub fn deref_op(self) -> OpCode {
        match self {
            Storage::Global(_) => OpCode::DerefAbsolute,
            Storage::Local(_) => OpCode::DerefRelative,
        }
    }

    /// The write opcode; `keep` re-pushes the stored value.
    pub fn mutate_op(self, keep: bool) -> OpCode {
        match (self, keep) {
            (Storage::Global(_), false) => OpCode::MutateAbsolute,
            (Storage::Global(_), true) => OpCode::MutateAbsoluteKeep,
            (Storage::Local(_), false) => OpCode::MutateRelative,
            (Storage::Local(_), true) => OpCode::MutateRelativeKeep,
        }
    }
}

/// Resolve a variable reference. Locals shadow globals.
pub fn resolve_storage(compiler: &ExprCompiler<'_>, ident: &IdentExpr<'_>) -> Result<Storage> {
    match compiler.ctx().tables().resolve(ident.name) {
        VarLookup::Local(slot) => Ok(Storage::Local(slot)),
        VarLookup::Global(address) => Ok(Storage::Global(address)),
        VarLookup::NotFound => Err(CompilationError::UnknownVariable {
            name: ident.name.to_string(),
            span: ident.span,
        }),
    }
}

/// Push the address of `storage` followed by its dereference.
pub fn emit_load(compiler: &mut ExprCompiler<'_>, storage: Storage) {
    let emitter = compiler.emitter();
    emitter.emit_address(storage.address());
    emitter.emit(storage.deref_op());
}

/// Push the current address of `storage` and write the value beneath it.
pub fn emit_store(compiler: &mut ExprCompiler<'_>, storage: Storage, keep: bool) {
    let emitter = compiler.emitter();
    emitter.emit_address(storage.address());
    emitter.emit(storage.mutate_op(keep));
}

pub fn compile_ident(compiler: &mut ExprCompiler<'_>, ident: &IdentExpr<'_>) -> Result<()> {
    let storage = resolve_storage(compiler, ident)?;
    emit_load(compiler, storage);
    Ok(())
}
