// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless reordering.
//!
//! Scripts three pointer gestures against a `RowStrip`: a short sort, a drag
//! that auto-scrolls to the bottom edge, and a fling that removes a row.
//! Engine and gesture events are logged through `tracing`.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_reorder_demos`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use tracing_subscriber::EnvFilter;
use understory_reorder::snapshot::SnapshotRenderer;
use understory_reorder::strip::RowStrip;
use understory_reorder::{DragEngine, DragOutcome, PointerEvent, ReorderConfig, SlotGeometry};
use understory_reorder_gesture::{GestureConfig, GestureTranslator, RemoveMode, WholeRow};

type Capture = fn(usize, Rect) -> Option<String>;

/// Frame interval for the auto-scroll loop.
const FRAME_MS: u64 = 16;

fn capture(slot: usize, bounds: Rect) -> Option<String> {
    Some(format!("row {slot} @ {:.0}", bounds.y0))
}

struct Demo {
    list: RowStrip,
    engine: DragEngine<SnapshotRenderer<Capture>>,
    gestures: GestureTranslator,
    labels: Rc<RefCell<Vec<String>>>,
    now: u64,
}

impl Demo {
    fn new(count: usize) -> Self {
        let heights = (0..count).map(|i| 36.0 + 12.0 * (i % 3) as f64);
        let list = RowStrip::new(heights, Size::new(320.0, 400.0)).with_divider(1.0);
        let gesture_config = GestureConfig::default().with_removal(RemoveMode::FlingRight);
        let renderer =
            SnapshotRenderer::new(capture as Capture).with_fade(gesture_config.slide_fade());
        let mut engine = DragEngine::with_renderer(ReorderConfig::default(), renderer);

        let labels = Rc::new(RefCell::new(
            (0..count).map(|i| format!("item {i}")).collect::<Vec<_>>(),
        ));
        {
            let drop_labels = labels.clone();
            engine.set_drop_listener(move |from, to| {
                let mut labels = drop_labels.borrow_mut();
                let item = labels.remove(from);
                labels.insert(to, item);
            });
            let remove_labels = labels.clone();
            engine.set_remove_listener(move |index| {
                remove_labels.borrow_mut().remove(index);
            });
            engine.set_drag_listener(|from, to| {
                tracing::info!(message = "gap moved", from, to);
            });
        }

        Self {
            list,
            engine,
            gestures: GestureTranslator::new(gesture_config),
            labels,
            now: 0,
        }
    }

    fn send(&mut self, event: PointerEvent) -> Option<DragOutcome> {
        let outcome = self
            .gestures
            .handle(&mut self.engine, &mut self.list, &mut WholeRow, &event);
        self.list.flush(&mut self.engine);
        if let Some(outcome) = outcome {
            self.apply(outcome);
        }
        outcome
    }

    /// Keeps row heights in step with the labels the listeners edited.
    fn apply(&mut self, outcome: DragOutcome) {
        match outcome {
            DragOutcome::Dropped { from, to } => {
                self.list.move_item(from, to);
            }
            DragOutcome::Removed { slot } => {
                self.list.remove_item(slot);
            }
            DragOutcome::Cancelled => {}
        }
        self.list.flush(&mut self.engine);
    }

    fn press(&mut self, at: Point) {
        self.now += FRAME_MS;
        self.send(PointerEvent::down(at, self.now));
    }

    fn glide(&mut self, from: Point, to: Point, steps: u32) {
        for i in 1..=steps {
            self.now += FRAME_MS;
            let at = from.lerp(to, f64::from(i) / f64::from(steps));
            self.send(PointerEvent::moved(at, self.now));
        }
    }

    fn release(&mut self, at: Point) -> Option<DragOutcome> {
        self.now += FRAME_MS;
        self.send(PointerEvent::up(at, self.now))
    }

    /// Runs posted auto-scroll ticks until the loop ends or `limit` frames pass.
    fn run_scroll(&mut self, limit: usize) -> usize {
        let mut frames = 0;
        while frames < limit && self.list.take_tick() {
            self.now += FRAME_MS;
            self.engine.scroll_tick(&mut self.list, self.now);
            self.list.flush(&mut self.engine);
            frames += 1;
        }
        frames
    }

    fn row_center(&self, slot: usize) -> Option<Point> {
        let row = self.list.slot_bounds(slot)?;
        Some(Point::new(40.0, row.center().y))
    }

    fn print_order(&self, title: &str) {
        let labels = self.labels.borrow();
        println!("{title}: {}", labels.join(", "));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut demo = Demo::new(24);
    demo.print_order("start");

    // Sort: carry row 2 down past two neighbours.
    let Some(start) = demo.row_center(2) else {
        return;
    };
    demo.press(start);
    let target = start + Vec2::new(0.0, 110.0);
    demo.glide(start, target, 8);
    println!("dividers while dragging: {:?}", demo.engine.gap_dividers(&demo.list));
    let outcome = demo.release(target);
    println!("sort: {outcome:?}");
    demo.print_order("after sort");

    // Auto-scroll: hold row 1 against the bottom edge.
    let Some(start) = demo.row_center(1) else {
        return;
    };
    demo.press(start);
    let edge = Point::new(start.x, 395.0);
    demo.glide(start, edge, 4);
    let frames = demo.run_scroll(60);
    println!(
        "scrolled {frames} frames, first visible row is now {:?}",
        demo.list.first_visible()
    );
    let outcome = demo.release(edge);
    println!("scroll drop: {outcome:?}");
    demo.print_order("after scroll drop");

    // Fling: throw the first fully visible row to the right.
    let Some(first) = demo.list.first_visible() else {
        return;
    };
    let Some(start) = demo.row_center(first + 1) else {
        return;
    };
    demo.press(start);
    let thrown = start + Vec2::new(120.0, 0.0);
    demo.glide(start, thrown, 4);
    let outcome = demo.release(thrown);
    println!("fling: {outcome:?}");
    demo.print_order("after fling");
}
