// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_reorder_gesture::velocity::VelocityTracker;

fn bench_velocity(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_reorder_gesture");

    // A 120 Hz pointer stream over one second; the window keeps the last 100 ms.
    group.bench_function("track_and_estimate(120hz,1s)", |b| {
        b.iter(|| {
            let mut tracker = VelocityTracker::default();
            let mut last = None;
            for i in 0..120_u32 {
                let t = u64::from(i) * 1_000 / 120;
                tracker.add(t, Point::new(f64::from(i) * 6.0, 100.0));
                last = tracker.velocity();
            }
            black_box(last)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_velocity);
criterion_main!(benches);
