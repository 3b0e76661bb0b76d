//! Benchmarks for the hot path: ring buffer writes, read-out and line parsing
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serialvis_rs::capture::{CaptureCoordinator, ExportLog, LineParser, RingBuffer};
use serialvis_rs::frontend::plot::series_points;
use serialvis_rs::types::CAPACITY_PRESETS;

fn filled_buffer(capacity: usize) -> RingBuffer {
    let mut buffer = RingBuffer::new(capacity).unwrap();
    for i in 0..capacity + capacity / 2 {
        buffer.push(i as f64);
    }
    buffer
}

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer_push");

    for size in CAPACITY_PRESETS.iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("push", size), size, |b, &size| {
            let mut buffer = RingBuffer::new(size).unwrap();
            let mut i = 0u64;
            b.iter(|| {
                buffer.push(black_box(i as f64));
                i = i.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_read_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer_read_out");

    for size in CAPACITY_PRESETS.iter() {
        let buffer = filled_buffer(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("read_ordered", size), &buffer, |b, buffer| {
            b.iter(|| black_box(buffer.read_ordered()));
        });
        group.bench_with_input(BenchmarkId::new("plot_points", size), &buffer, |b, buffer| {
            b.iter(|| black_box(series_points(buffer.iter())));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_parsing");
    let line = "T:23.5,V:3.30,I:0.12,P:0.40";
    let parser = LineParser::new();
    let filtered = LineParser::with_allowed_tags(["T", "V"]);

    group.throughput(Throughput::Elements(1));
    group.bench_function("parse_4_fields", |b| {
        b.iter(|| black_box(parser.parse(black_box(line))));
    });
    group.bench_function("parse_4_fields_allow_list", |b| {
        b.iter(|| black_box(filtered.parse(black_box(line))));
    });
    group.bench_function("parse_malformed", |b| {
        b.iter(|| black_box(parser.parse(black_box("T:23.5,V:bad,I:0.12"))));
    });

    group.finish();
}

fn bench_on_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinator");

    // Bounded log so long runs do not grow memory
    let mut capture = CaptureCoordinator::new(1000)
        .unwrap()
        .with_export_log(ExportLog::with_limit(100_000));
    for (i, tag) in ["T", "V", "I", "P"].iter().enumerate() {
        capture
            .register_channel(*tag, serialvis_rs::types::generate_color(i as u32))
            .unwrap();
    }

    group.throughput(Throughput::Elements(1));
    group.bench_function("on_line", |b| {
        b.iter(|| black_box(capture.on_line(black_box("T:23.5,V:3.30,I:0.12,P:0.40"))));
    });

    group.finish();
}

criterion_group!(benches, bench_push, bench_read_out, bench_parse, bench_on_line);
criterion_main!(benches);
