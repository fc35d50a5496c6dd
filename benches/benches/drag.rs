// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size, Vec2};
use understory_reorder::snapshot::SnapshotRenderer;
use understory_reorder::strip::RowStrip;
use understory_reorder::{DragEngine, DragFlags, PointerEvent, ReorderConfig};

type Capture = fn(usize, Rect) -> Option<()>;
type Engine = DragEngine<SnapshotRenderer<Capture>>;

fn capture(_slot: usize, _bounds: Rect) -> Option<()> {
    Some(())
}

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

/// Rows between 24 and 87 px tall.
fn mixed_heights(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg(seed);
    (0..n).map(|_| f64::from(24 + rng.next_u32() % 64)).collect()
}

/// A strip with slot 1 held under the pointer.
fn grabbed(heights: Vec<f64>, viewport: Size) -> (RowStrip, Engine) {
    let mut list = RowStrip::new(heights, viewport);
    let renderer = SnapshotRenderer::new(capture as Capture);
    let mut engine = DragEngine::with_renderer(ReorderConfig::default(), renderer);
    let row = list.placed_rows()[1].bounds;
    let press = Point::new(20.0, row.center().y);
    engine.handle_pointer(&mut list, &PointerEvent::down(press, 0));
    engine
        .start_drag(
            &mut list,
            1,
            DragFlags::VERTICAL,
            Vec2::new(20.0, row.height() / 2.0),
        )
        .expect("slot 1 is visible and draggable");
    list.flush(&mut engine);
    (list, engine)
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_reorder");
    group.sample_size(50);

    for &n in &[64_usize, 1_024] {
        let viewport = Size::new(320.0, 2_000.0);
        let heights = mixed_heights(n, 0x5EED_0000_0000_0001);

        // Pointer walks down the viewport one pixel per event, as a slow drag would.
        group.bench_function(format!("sweep_step(n={n})"), |b| {
            b.iter_batched(
                || grabbed(heights.clone(), viewport),
                |(mut list, mut engine)| {
                    for y in 40..1_600 {
                        let event = PointerEvent::moved(Point::new(20.0, f64::from(y)), 0);
                        engine.handle_pointer(&mut list, &event);
                        list.flush(&mut engine);
                    }
                    black_box(engine.shuffle_state());
                },
                BatchSize::SmallInput,
            );
        });

        // One move across most of the viewport, resolved by repeated passes.
        group.bench_function(format!("jump_resolve(n={n})"), |b| {
            b.iter_batched(
                || grabbed(heights.clone(), viewport),
                |(mut list, mut engine)| {
                    let event = PointerEvent::moved(Point::new(20.0, 1_600.0), 0);
                    engine.handle_pointer(&mut list, &event);
                    list.flush(&mut engine);
                    black_box(engine.shuffle_state());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("drop(n={n})"), |b| {
            b.iter_batched(
                || {
                    let (mut list, mut engine) = grabbed(heights.clone(), viewport);
                    let event = PointerEvent::moved(Point::new(20.0, 900.0), 0);
                    engine.handle_pointer(&mut list, &event);
                    list.flush(&mut engine);
                    (list, engine)
                },
                |(mut list, mut engine)| {
                    let up = PointerEvent::up(Point::new(20.0, 900.0), 1);
                    black_box(engine.handle_pointer(&mut list, &up));
                    list.flush(&mut engine);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_drag);
criterion_main!(benches);
