//! Criterion benchmarks for the redaction hot path.
//!
//! Every log record passes through `RedactionEngine::redact`, so the clean
//! (no-match) path matters as much as the dirty one.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scrub_redact::RedactionEngine;

fn bench_redact(c: &mut Criterion) {
    let engine = RedactionEngine::standard().expect("standard catalog compiles");

    let clean = "API request completed in 0.234s with status 200";
    let mixed =
        "User john@example.com (SSN: 987-65-4321) paid with card 4532-1234-5678-9010";
    let long_clean = "worker heartbeat ok; queue depth nominal; ".repeat(64);

    let mut group = c.benchmark_group("redact");

    let inputs = [
        ("clean", clean),
        ("mixed", mixed),
        ("long_clean", long_clean.as_str()),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::new("redact_cow", name), &input, |b, input| {
            b.iter(|| {
                let out = engine.redact_cow(black_box(input));
                black_box(out);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_redact);
criterion_main!(benches);
