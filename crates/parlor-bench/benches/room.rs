//! Room engine benchmarks.
//!
//! These measure command cost as the timeline grows and the price of
//! notifying listeners, which clone a snapshot per command.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parlor_bench::populated_room;
use parlor_core::spawn;

/// Benchmark posting into rooms of different sizes.
fn bench_send_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("send_message");

    for size in [0usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("no_listeners", size), &size, |b, &size| {
            let mut room = populated_room(10, size);
            b.iter(|| room.send_message(black_box("user-0"), black_box("hello")));
        });

        group.bench_with_input(BenchmarkId::new("one_listener", size), &size, |b, &size| {
            let mut room = populated_room(10, size);
            room.subscribe(|snapshot| {
                black_box(snapshot.messages.len());
            });
            b.iter(|| room.send_message(black_box("user-0"), black_box("hello")));
        });
    }

    group.finish();
}

/// Benchmark colour lookup by roster position.
fn bench_color_for(c: &mut Criterion) {
    let mut group = c.benchmark_group("color_for");

    for participants in [2usize, 100, 1_000] {
        let room = populated_room(participants, 0);
        let last = format!("user-{}", participants - 1);
        group.bench_with_input(BenchmarkId::new("last", participants), &last, |b, name| {
            b.iter(|| black_box(room.color_for(black_box(name))).len());
        });
    }

    group.finish();
}

/// Benchmark the single-writer task round trip.
fn bench_handle_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let room = runtime.block_on(async { spawn(populated_room(10, 0)).0 });

    c.bench_function("handle/send_message", |b| {
        b.iter(|| {
            runtime.block_on(room.send_message(black_box("user-0"), black_box("hello")))
        });
    });
}

criterion_group!(
    benches,
    bench_send_message,
    bench_color_for,
    bench_handle_round_trip,
);
criterion_main!(benches);
