//! Line interpretation benchmarks.
//! Run: cargo bench

use std::io;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gcon::display::Backdrop;
use gcon::tokenizer::tokenize;
use gcon::Interpreter;

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_quoted_save", |b| {
        b.iter(|| black_box(tokenize(black_box("save \"my \"\"best\"\" picture.png\""))))
    });
}

fn bench_interpret(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpret_line");
    group.sample_size(50);

    let mut interpreter = Interpreter::new(io::sink(), Backdrop::default(), 4096);
    interpreter
        .interpret("new 512 512 white")
        .expect("canvas should allocate");

    for (name, line) in [
        ("fill_rect", "fr #80FF0000 0.1w 0.1h 0.8w 0.8h"),
        ("fill_ellipse", "fe cornflowerblue 0 0 1w 1h"),
        ("draw_polygon", "dp black 3 0 0 1w 0 0.5w 1h 0 0"),
        ("rejected", "fr red 0 0 oops 1h"),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                interpreter
                    .interpret(black_box(line))
                    .expect("console write");
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_interpret);
criterion_main!(benches);
