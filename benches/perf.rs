use criterion::{criterion_group, criterion_main, Criterion};

use woundwait::grammar::parse_line;
use woundwait::Arbiter;

/// Builds a schedule with `n` transactions that each read-then-write a
/// private item and commit immediately: no contention, pure grant-path
/// overhead.
fn uncontended_schedule(n: u64) -> Vec<String> {
    let mut lines = Vec::with_capacity(n as usize * 4);
    for id in 0..n {
        lines.push(format!("b {id}"));
        lines.push(format!("r {id} item{id}"));
        lines.push(format!("w {id} item{id}"));
        lines.push(format!("e {id}"));
    }
    lines
}

/// Builds a schedule where every transaction contends for the same single
/// item. All `n` transactions begin first, in increasing id (and so
/// increasing-timestamp, i.e. decreasing-priority) order; the writes then
/// run in *decreasing* id order, so each writer after the first is older
/// than whoever currently holds the item and wounds it on the spot —
/// exercising the wound path on every write but the very first.
fn hot_item_schedule(n: u64) -> Vec<String> {
    let mut lines = Vec::with_capacity(n as usize * 2);
    for id in 0..n {
        lines.push(format!("b {id}"));
    }
    for id in (0..n).rev() {
        lines.push(format!("w {id} hot"));
    }
    lines
}

fn run_schedule(lines: &[String]) {
    let mut arbiter = Arbiter::new();
    for (line_no, line) in lines.iter().enumerate() {
        let op = parse_line(line, line_no + 1).expect("benchmark schedules are well-formed");
        arbiter.apply(&op);
    }
}

fn bench_arbiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("arbiter");

    let uncontended = uncontended_schedule(1_000);
    group.bench_function("uncontended_grants_1000_txns", |b| {
        b.iter(|| run_schedule(&uncontended));
    });

    let hot_item = hot_item_schedule(1_000);
    group.bench_function("wound_cascade_1000_txns_one_item", |b| {
        b.iter(|| run_schedule(&hot_item));
    });

    group.finish();
}

criterion_group!(benches, bench_arbiter);
criterion_main!(benches);
