//! Hot-path throughput: validate against a populated registry, and the
//! create/destroy cycle.

use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use objtrack_core::{
    Handle, MessageCode, NullSink, ObjectKind, ObjectStatus, ObjectTracker, Scope, TrackerMode,
};

fn populated_tracker(objects: u64) -> ObjectTracker {
    let tracker = ObjectTracker::with_mode(Arc::new(NullSink), TrackerMode::Enabled);
    {
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        guard.create_device(Handle(1), Handle(2));
        for h in 0..objects {
            guard.create(
                Scope::Device(Handle(2)),
                Handle(100 + h),
                ObjectKind::Buffer,
                Handle(2),
                ObjectStatus::empty(),
            );
        }
    }
    tracker
}

fn bench_validate(c: &mut Criterion) {
    let tracker = populated_tracker(10_000);
    c.bench_function("validate_hit_10k", |b| {
        b.iter(|| {
            let mut guard = tracker.lock();
            black_box(guard.validate(
                Scope::Device(Handle(2)),
                black_box(Handle(5_100)),
                ObjectKind::Buffer,
                false,
                MessageCode::UNDEFINED,
            ))
        })
    });
}

fn bench_create_destroy(c: &mut Criterion) {
    let tracker = populated_tracker(0);
    c.bench_function("create_destroy_cycle", |b| {
        b.iter(|| {
            let mut guard = tracker.lock();
            guard.create(
                Scope::Device(Handle(2)),
                Handle(9_999),
                ObjectKind::Fence,
                Handle(2),
                ObjectStatus::empty(),
            );
            black_box(guard.destroy(
                Scope::Device(Handle(2)),
                Handle(9_999),
                ObjectKind::Fence,
                MessageCode::UNDEFINED,
            ))
        })
    });
}

criterion_group!(benches, bench_validate, bench_create_destroy);
criterion_main!(benches);
