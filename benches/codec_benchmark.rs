use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use go125_astjson::syntax::parse_file;
use go125_astjson::{marshal, to_json, unmarshal, Options};
use std::hint::black_box as bb;

// =============================================================================
// Corpus: the integration-test fixtures
// =============================================================================

const SHAPES: &str = include_str!("../tests/testdata/shapes.go");
const CONTROL: &str = include_str!("../tests/testdata/control.go");
const GENERICS: &str = include_str!("../tests/testdata/generics.go");

const CORPORA: [(&str, &str); 3] = [
    ("shapes", SHAPES),
    ("control", CONTROL),
    ("generics", GENERICS),
];

fn options() -> [(&'static str, Options); 2] {
    [
        ("bare", Options::new()),
        (
            "full",
            Options::new()
                .with_comments(true)
                .with_positions(true)
                .with_references(true)
                .with_imports(true),
        ),
    ]
}

// =============================================================================
// Benchmark 1: tree -> mirror -> JSON text
// =============================================================================

fn bench_marshal(c: &mut Criterion) {
    let mut group = c.benchmark_group("marshal");

    for (name, src) in CORPORA {
        for (label, opts) in options() {
            let sf = parse_file("bench.go", src, opts.parse_mode()).unwrap();
            group.throughput(Throughput::Bytes(src.len() as u64));

            group.bench_with_input(BenchmarkId::new(format!("mirror_{label}"), name), &sf, |b, sf| {
                b.iter(|| bb(marshal(bb(sf), &opts)));
            });

            group.bench_with_input(BenchmarkId::new(format!("text_{label}"), name), &sf, |b, sf| {
                b.iter(|| {
                    let json = to_json(&marshal(bb(sf), &opts), 0).unwrap();
                    bb(json.len());
                });
            });
        }
    }

    group.finish();
}

// =============================================================================
// Benchmark 2: JSON text -> tree
// =============================================================================

fn bench_unmarshal(c: &mut Criterion) {
    let mut group = c.benchmark_group("unmarshal");

    for (name, src) in CORPORA {
        for (label, opts) in options() {
            let sf = parse_file("bench.go", src, opts.parse_mode()).unwrap();
            let json = to_json(&marshal(&sf, &opts), 0).unwrap();
            group.throughput(Throughput::Bytes(json.len() as u64));

            group.bench_with_input(BenchmarkId::new(label, name), &json, |b, json| {
                b.iter(|| bb(unmarshal(bb(json), &opts).unwrap()));
            });
        }
    }

    group.finish();
}

// =============================================================================
// Benchmark 3: full round trip, source in and source out
// =============================================================================

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");
    let opts = Options::new().with_comments(true);

    for (name, src) in CORPORA {
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &src, |b, &src| {
            b.iter_batched(
                || src.to_string(),
                |src| {
                    let sf = parse_file("bench.go", &src, opts.parse_mode()).unwrap();
                    let json = to_json(&marshal(&sf, &opts), 0).unwrap();
                    bb(unmarshal(&json, &opts).unwrap().print())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Criterion registration
// =============================================================================

criterion_group!(benches, bench_marshal, bench_unmarshal, bench_round_trip);
criterion_main!(benches);
