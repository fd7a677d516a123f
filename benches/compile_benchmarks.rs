//! Performance benchmarks for the Corvid compile pipeline.
//!
//! Trees are generated in an arena ahead of time, so only registration,
//! code generation and encoding are measured:
//! - Size-based: programs with 1 to 500 functions
//! - Feature-specific: deep loop nests, many globals, REPL buffers
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- "functions_500"
//! ```

use bumpalo::Bump;
use corvid::prelude::*;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Print how many frames the profiler kept.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    let Some(frame_view) = FRAME_VIEW.get() else {
        println!("Profiler not initialized");
        return;
    };
    let view = frame_view.lock();
    println!(
        "\n=== Profiling: {} frames recorded ===\n",
        view.recent_frames().count()
    );
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

// =============================================================================
// Tree generation
// =============================================================================

fn int<'ast>(value: i32) -> Expr<'ast> {
    Expr::Literal(LiteralExpr {
        kind: LiteralKind::Int(value),
        span: Span::default(),
    })
}

fn ident<'ast>(name: &'ast str) -> Expr<'ast> {
    Expr::Ident(IdentExpr {
        name,
        ty: DataType::Int,
        span: Span::default(),
    })
}

fn binary<'ast>(arena: &'ast Bump, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
    Expr::Binary(arena.alloc(BinaryExpr {
        left: arena.alloc(left),
        op,
        right: arena.alloc(right),
        ty: DataType::Int,
        span: Span::default(),
    }))
}

fn local<'ast>(arena: &'ast Bump, name: &'ast str, value: i32) -> Stmt<'ast> {
    Stmt::VarDecl(VarDeclStmt {
        name,
        ty: DataType::Int,
        init: Some(arena.alloc(int(value))),
        span: Span::default(),
    })
}

fn add_assign<'ast>(arena: &'ast Bump, target: &'ast str, value: Expr<'ast>) -> Stmt<'ast> {
    let expr = arena.alloc(Expr::Assign(arena.alloc(AssignExpr {
        target: IdentExpr {
            name: target,
            ty: DataType::Int,
            span: Span::default(),
        },
        op: AssignOp::AddAssign,
        value: arena.alloc(value),
        span: Span::default(),
    })));
    Stmt::Expr(ExprStmt {
        expr,
        span: Span::default(),
    })
}

/// `for (int i = 0; i < 10; i += 1) { <body> }`
fn counted_loop<'ast>(arena: &'ast Bump, var: &'ast str, body: &[Stmt<'ast>]) -> Stmt<'ast> {
    Stmt::For(arena.alloc(ForStmt {
        init: Some(arena.alloc(local(arena, var, 0))),
        condition: Some(arena.alloc(binary(arena, ident(var), BinaryOp::Less, int(10)))),
        increment: Some(arena.alloc(add_assign(arena, var, int(1)))),
        body: arena.alloc(Stmt::Block(Block {
            stmts: arena.alloc_slice_copy(body),
            span: Span::default(),
        })),
        span: Span::default(),
    }))
}

/// A function summing over a two-level loop nest.
fn summing_function<'ast>(arena: &'ast Bump, name: &'ast str) -> Item<'ast> {
    let product = binary(arena, ident("i"), BinaryOp::Mul, ident("j"));
    let inner = counted_loop(arena, "j", &[add_assign(arena, "total", product)]);
    let outer = counted_loop(arena, "i", &[inner]);
    let total = arena.alloc(ident("total"));
    let stmts = [
        local(arena, "total", 0),
        outer,
        Stmt::Return(ReturnStmt {
            value: Some(total),
            span: Span::default(),
        }),
    ];
    Item::Function(arena.alloc(FunctionDecl {
        name,
        params: &[],
        return_type: Some(DataType::Int),
        body: Block {
            stmts: arena.alloc_slice_copy(&stmts),
            span: Span::default(),
        },
        span: Span::default(),
    }))
}

fn program_with_functions(arena: &Bump, count: usize) -> Script<'_> {
    let mut items: Vec<Item<'_>> = (1..count)
        .map(|i| summing_function(arena, arena.alloc_str(&format!("f{i}"))))
        .collect();
    items.push(summing_function(arena, "main"));
    Script::new(arena.alloc_slice_copy(&items), Span::default())
}

fn nested_loops(arena: &Bump, depth: usize) -> Script<'_> {
    let mut body = vec![add_assign(arena, "total", int(1))];
    for level in 0..depth {
        let var = arena.alloc_str(&format!("v{level}"));
        body = vec![counted_loop(arena, var, &body)];
    }
    let mut stmts = vec![local(arena, "total", 0)];
    stmts.extend(body);
    let main = Item::Function(arena.alloc(FunctionDecl {
        name: "main",
        params: &[],
        return_type: None,
        body: Block {
            stmts: arena.alloc_slice_copy(&stmts),
            span: Span::default(),
        },
        span: Span::default(),
    }));
    Script::new(arena.alloc_slice_copy(&[main]), Span::default())
}

fn globals(arena: &Bump, count: usize) -> Vec<Item<'_>> {
    (0..count)
        .map(|i| {
            let value = i32::try_from(i).unwrap_or(i32::MAX);
            Item::Var(VarDeclStmt {
                name: arena.alloc_str(&format!("g{i}")),
                ty: DataType::Int,
                init: Some(arena.alloc(int(value))),
                span: Span::default(),
            })
        })
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

/// Benchmark compilation across program sizes.
fn size_based_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut group = c.benchmark_group("compile/program_sizes");
    for count in [1usize, 10, 100, 500] {
        let arena = Bump::new();
        let script = program_with_functions(&arena, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("functions_{count}"), |b| {
            b.iter(|| {
                let bytes = compile(black_box(&script), "", "main").unwrap();
                end_profiling_frame();
                black_box(bytes.len())
            });
        });
    }
    group.finish();

    print_profiling_stats();
}

/// Benchmark specific code generation paths.
fn feature_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/features");

    let arena = Bump::new();
    let deep = nested_loops(&arena, 16);
    group.bench_function("loop_nest_16", |b| {
        b.iter(|| black_box(compile(black_box(&deep), "", "main").unwrap().len()));
    });

    let mut items = globals(&arena, 1000);
    items.push(summing_function(&arena, "main"));
    let many_globals = Script::new(arena.alloc_slice_copy(&items), Span::default());
    group.bench_function("globals_1000", |b| {
        b.iter(|| black_box(compile(black_box(&many_globals), "", "main").unwrap().len()));
    });

    // One global per buffer against growing tables
    let buffers: Vec<_> = globals(&arena, 200)
        .into_iter()
        .map(|item| Script::new(arena.alloc_slice_copy(&[item]), Span::default()))
        .collect();
    group.bench_function("repl_buffers_200", |b| {
        b.iter(|| {
            let mut compiler = Compiler::default();
            for buffer in &buffers {
                black_box(compiler.emit_to_buffer(buffer).unwrap());
            }
        });
    });

    group.finish();
}

/// Benchmark the byte codec on a compiled program.
fn codec_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let arena = Bump::new();
    let bytes = compile(&program_with_functions(&arena, 100), "", "main").unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("parse_100_functions", |b| {
        b.iter(|| black_box(Program::parse(black_box(&bytes)).unwrap().instructions.len()));
    });

    let program = Program::parse(&bytes).unwrap();
    group.bench_function("disassemble_100_functions", |b| {
        b.iter(|| black_box(program.disassemble().len()));
    });

    group.finish();
}

criterion_group!(
    benches,
    size_based_benchmarks,
    feature_benchmarks,
    codec_benchmarks
);
criterion_main!(benches);
