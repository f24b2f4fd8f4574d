use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::io::Cursor;

use awkcore::{Cell, RecordEngine};

fn engine_reading(input: String) -> RecordEngine {
    let mut engine = RecordEngine::new();
    engine.set_stdin(Box::new(Cursor::new(input)));
    engine
}

/// Feed a record into the engine and split it.
fn split_once(engine: &mut RecordEngine, record: &str) -> usize {
    engine
        .set_field(0, Cell::from_string(record.to_string()))
        .unwrap();
    engine.nf().unwrap()
}

// ============ Record Reading Benchmarks ============

fn bench_reading(c: &mut Criterion) {
    let mut group = c.benchmark_group("reading");

    let lines: String = (0..1000)
        .map(|i| format!("field{} another{} third{}\n", i, i, i))
        .collect();
    group.throughput(Throughput::Bytes(lines.len() as u64));
    group.bench_function("newline_records", |b| {
        b.iter(|| {
            let mut engine = engine_reading(black_box(lines.clone()));
            let mut n = 0u64;
            while engine.next_record().unwrap() {
                n += 1;
            }
            n
        })
    });

    let paragraphs: String = (0..500)
        .map(|i| format!("line one {}\nline two {}\n\n", i, i))
        .collect();
    group.throughput(Throughput::Bytes(paragraphs.len() as u64));
    group.bench_function("paragraph_records", |b| {
        b.iter(|| {
            let mut engine = engine_reading(black_box(paragraphs.clone()));
            engine.set_rs("");
            let mut n = 0u64;
            while engine.next_record().unwrap() {
                n += 1;
            }
            n
        })
    });

    group.finish();
}

// ============ Field Splitting Benchmarks ============

fn bench_splitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("splitting");

    let blank_sep = "alpha  beta\tgamma delta epsilon ".repeat(20);
    let colon_sep = "a:bb:ccc:dddd:".repeat(30);
    let digit_sep = "aa11bb222cc3dd".repeat(25);

    group.bench_function("whitespace_mode", |b| {
        let mut engine = RecordEngine::new();
        b.iter(|| split_once(&mut engine, black_box(&blank_sep)))
    });

    group.bench_function("single_char_mode", |b| {
        let mut engine = RecordEngine::new();
        engine.set_fs(":");
        b.iter(|| split_once(&mut engine, black_box(&colon_sep)))
    });

    group.bench_function("char_mode", |b| {
        let mut engine = RecordEngine::new();
        engine.set_fs("");
        b.iter(|| split_once(&mut engine, black_box(&colon_sep)))
    });

    group.bench_function("regex_mode", |b| {
        let mut engine = RecordEngine::new();
        engine.set_fs("[0-9]+");
        b.iter(|| split_once(&mut engine, black_box(&digit_sep)))
    });

    group.finish();
}

// ============ Record Rebuild Benchmarks ============

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    let record = "one two three four five six seven eight".repeat(10);

    group.bench_function("split_and_rebuild", |b| {
        let mut engine = RecordEngine::new();
        b.iter(|| {
            let nf = split_once(&mut engine, black_box(&record));
            engine.set_nf(nf as i64).unwrap();
            engine.get_field(0).unwrap().as_str().len()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_reading, bench_splitting, bench_rebuild);
criterion_main!(benches);
