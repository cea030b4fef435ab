use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quiesce::{
    batch::{DedupPolicy, PendingQueue},
    slot_for, EventId, SendTime,
};

/// Inserts `num_events` events with descending send times and drains them
/// back in ascending order.
fn enqueue_drain(num_events: usize) {
    let mut queue = PendingQueue::new(DedupPolicy::AllowDuplicates);
    for i in 0..num_events {
        queue.insert(
            EventId::from(format!("event-{}", i)),
            SendTime::new((num_events - i) as u64),
        );
    }
    while !queue.is_empty() {
        black_box(queue.pop_earliest().unwrap());
    }
}

fn derive_slots(num_events: usize) {
    for i in 0..num_events {
        black_box(slot_for(&EventId::from(format!("event-{}", i))));
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("enqueue_drain 1000", |b| b.iter(|| enqueue_drain(1000)));
    c.bench_function("enqueue_drain 10000", |b| b.iter(|| enqueue_drain(10000)));
    c.bench_function("derive_slots 1000", |b| b.iter(|| derive_slots(1000)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
