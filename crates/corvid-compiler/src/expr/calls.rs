//! Function calls.

use corvid_core::CompilationError;
use corvid_core::ast::CallExpr;

use super::{ExprCompiler, Result};
use crate::ids::FunctionId;

/// Arguments left to right, then `CALL id, argc`.
///
/// The callee is resolved by name and argument tags before anything is
/// emitted. Every call pushes one value; functions without a return value
/// return null.
pub fn compile_call(compiler: &mut ExprCompiler<'_>, call: &CallExpr<'_>) -> Result<()> {
    let id = resolve_callee(compiler, call)?;
    for arg in call.args {
        compiler.compile(arg)?;
    }
    let argc = u32::try_from(call.args.len())
        .map_err(|_| CompilationError::internal("argument count exceeds u32"))?;
    compiler.emitter().emit_call(id, argc);
    Ok(())
}

fn resolve_callee(compiler: &ExprCompiler<'_>, call: &CallExpr<'_>) -> Result<FunctionId> {
    let tables = compiler.ctx().tables();
    let tags = call
        .args
        .iter()
        .map(|arg| tables.type_tag(&arg.data_type(), arg.span()))
        .collect::<Result<Vec<_>>>()?;
    tables
        .functions
        .resolve(call.callee, &tags)
        .ok_or_else(|| CompilationError::UnknownFunction {
            name: call.callee.to_string(),
            span: call.span,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{OpCode, Operand, TypeTag};
    use crate::context::CompilationContext;
    use crate::emit::BytecodeEmitter;
    use crate::expr::test_support::{boolean, int};
    use crate::symbols::FunctionKind;
    use bumpalo::Bump;
    use corvid_core::ast::{Expr, LiteralExpr, LiteralKind};
    use corvid_core::{DataType, Span};

    fn call<'ast>(arena: &'ast Bump, callee: &'ast str, args: Vec<Expr<'ast>>) -> CallExpr<'ast> {
        CallExpr {
            callee,
            args: arena.alloc_slice_copy(&args),
            return_type: Some(DataType::Int),
            span: Span::new(2, 5, 3),
        }
    }

    fn context() -> CompilationContext {
        let mut ctx = CompilationContext::new();
        let functions = &mut ctx.tables_mut().functions;
        functions
            .register("m::f", vec![TypeTag::Int], FunctionKind::Script, Span::default())
            .unwrap();
        functions
            .register(
                "m::f",
                vec![TypeTag::Int, TypeTag::Bool],
                FunctionKind::Native,
                Span::default(),
            )
            .unwrap();
        functions
            .register("m::s", vec![TypeTag::String], FunctionKind::Script, Span::default())
            .unwrap();
        ctx
    }

    #[test]
    fn args_then_call_with_resolved_id() {
        let arena = Bump::new();
        let mut ctx = context();
        let mut emitter = BytecodeEmitter::new();
        let expr = call(&arena, "m::f", vec![int(1), boolean(true)]);
        compile_call(&mut ExprCompiler::new(&mut ctx, &mut emitter), &expr).unwrap();

        let chunk = emitter.finish().unwrap();
        chunk.assert_opcodes(&[OpCode::PushInt, OpCode::PushBool, OpCode::Call]);
        assert_eq!(
            chunk.get(2).unwrap().operands().unwrap(),
            vec![Operand::U32(1), Operand::U32(2)]
        );
        assert_eq!(chunk.stack_effect(), 1);
    }

    #[test]
    fn null_argument_matches_any_parameter() {
        let arena = Bump::new();
        let mut ctx = context();
        let mut emitter = BytecodeEmitter::new();
        let null = Expr::Literal(LiteralExpr {
            kind: LiteralKind::Null,
            span: Span::default(),
        });
        let expr = call(&arena, "m::s", vec![null]);
        compile_call(&mut ExprCompiler::new(&mut ctx, &mut emitter), &expr).unwrap();

        let chunk = emitter.finish().unwrap();
        assert_eq!(
            chunk.get(1).unwrap().operands().unwrap(),
            vec![Operand::U32(2), Operand::U32(1)]
        );
    }

    #[test]
    fn unknown_signature_is_reported() {
        let arena = Bump::new();
        let mut ctx = context();
        let mut emitter = BytecodeEmitter::new();
        let expr = call(&arena, "m::f", vec![boolean(true)]);
        let err = compile_call(&mut ExprCompiler::new(&mut ctx, &mut emitter), &expr).unwrap_err();
        assert_eq!(
            err,
            CompilationError::UnknownFunction {
                name: "m::f".into(),
                span: Span::new(2, 5, 3),
            }
        );
        assert!(emitter.is_empty());
    }
}
