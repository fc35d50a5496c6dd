// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end drag sessions driven through the `RowStrip` reference host.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use understory_reorder::strip::RowStrip;
use understory_reorder::{
    DragEngine, DragError, DragFlags, DragOutcome, EngineState, FloatingItemRenderer, Gravity,
    PointerEvent, ReorderConfig, ShuffleState, SlotGeometry,
};

/// Floats a plain size and counts create/destroy calls.
#[derive(Default)]
struct Recording {
    created: usize,
    destroyed: usize,
    decline: bool,
}

impl FloatingItemRenderer for Recording {
    type Float = Size;

    fn create_float(&mut self, slot: usize, geometry: &dyn SlotGeometry) -> Option<Size> {
        if self.decline {
            return None;
        }
        self.created += 1;
        geometry.slot_bounds(slot).map(|r| r.size())
    }

    fn float_size(&self, float: &Size) -> Size {
        *float
    }

    fn destroy_float(&mut self, _float: Size) {
        self.destroyed += 1;
    }
}

type Log<T> = Rc<RefCell<Vec<T>>>;

struct Harness {
    list: RowStrip,
    engine: DragEngine<Recording>,
    drags: Log<(usize, usize)>,
    drops: Log<(usize, usize)>,
    removes: Log<usize>,
    time: u64,
}

impl Harness {
    fn new(list: RowStrip) -> Self {
        let mut engine = DragEngine::with_renderer(ReorderConfig::default(), Recording::default());
        let drags: Log<(usize, usize)> = Rc::default();
        let drops: Log<(usize, usize)> = Rc::default();
        let removes: Log<usize> = Rc::default();
        {
            let drags = drags.clone();
            engine.set_drag_listener(move |from, to| drags.borrow_mut().push((from, to)));
            let drops = drops.clone();
            engine.set_drop_listener(move |from, to| drops.borrow_mut().push((from, to)));
            let removes = removes.clone();
            engine.set_remove_listener(move |slot| removes.borrow_mut().push(slot));
        }
        Self {
            list,
            engine,
            drags,
            drops,
            removes,
            time: 0,
        }
    }

    /// Ten 40 px rows filling a 400 px viewport.
    fn ten_rows() -> Self {
        Self::new(RowStrip::uniform(10, 40.0, Size::new(320.0, 400.0)))
    }

    fn tick_time(&mut self) -> u64 {
        self.time += 1;
        self.time
    }

    fn press(&mut self, y: f64) {
        let time = self.tick_time();
        let event = PointerEvent::down(Point::new(10.0, y), time);
        self.engine.handle_pointer(&mut self.list, &event);
    }

    fn start(&mut self, slot: usize, offset_y: f64) -> Result<(), DragError> {
        let result = self.engine.start_drag(
            &mut self.list,
            slot,
            DragFlags::VERTICAL,
            Vec2::new(10.0, offset_y),
        );
        self.list.flush(&mut self.engine);
        result
    }

    /// Moves the pointer and lets the list settle.
    fn move_to(&mut self, y: f64) {
        self.move_once(y);
        self.list.flush(&mut self.engine);
    }

    /// Moves the pointer with a single layout pass.
    fn move_once(&mut self, y: f64) {
        let time = self.tick_time();
        let event = PointerEvent::moved(Point::new(10.0, y), time);
        self.engine.handle_pointer(&mut self.list, &event);
        self.list.flush(&mut self.engine);
    }

    fn release(&mut self, y: f64) -> Option<DragOutcome> {
        let time = self.tick_time();
        let event = PointerEvent::up(Point::new(10.0, y), time);
        let outcome = self.engine.handle_pointer(&mut self.list, &event);
        self.list.flush(&mut self.engine);
        outcome
    }

    fn float_slot(&self) -> usize {
        self.engine.session().unwrap().float_slot()
    }

    fn float_top(&self) -> f64 {
        self.engine.session().unwrap().floating_bounds().y0
    }

    fn shuffle(&self) -> ShuffleState {
        self.engine.shuffle_state().unwrap()
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn drag_down_two_rows_and_drop() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    assert_eq!(h.engine.state(), EngineState::Dragging);
    assert_eq!(h.float_top(), 120.0);

    let mut y = 150.0;
    while y <= 280.0 {
        h.move_to(y);
        y += 10.0;
    }
    assert_eq!(*h.drags.borrow(), [(3, 4), (4, 5), (5, 6)]);
    assert_eq!(h.float_slot(), 6);

    let outcome = h.release(280.0);
    assert_eq!(outcome, Some(DragOutcome::Dropped { from: 3, to: 6 }));
    assert_eq!(*h.drops.borrow(), [(3, 6)]);
    assert!(h.removes.borrow().is_empty());
    assert_eq!(h.engine.state(), EngineState::Idle);
    assert!(!h.engine.is_dragging());
    assert!(!h.engine.scroller().is_scrolling());

    let renderer = h.engine.renderer().unwrap();
    assert_eq!((renderer.created, renderer.destroyed), (1, 1));

    // Rows are back at their natural heights.
    assert_eq!(h.list.slot_bounds(3).unwrap().height(), 40.0);
    assert!(h.list.placed_rows().iter().all(|r| r.layout.content_visible));
}

#[test]
fn gap_slides_between_neighbours() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();

    h.move_to(150.0);
    let s = h.shuffle();
    assert_eq!((s.first_expanded, s.second_expanded), (3, 4));
    assert!(approx(s.slide_fraction, 1.0 / 6.0));
    assert_eq!(h.float_slot(), 3);

    // The source keeps most of the gap and hides its content.
    let source = h.engine.row_layout(&h.list, 3);
    assert!(approx(source.height, 33.5));
    assert!(!source.content_visible);
    let next = h.engine.row_layout(&h.list, 4);
    assert!(approx(next.height, 46.5));
    assert_eq!(next.gravity, Gravity::Top);
    assert!(next.content_visible);

    h.move_to(160.0);
    assert!(approx(h.shuffle().slide_fraction, 0.5));
    assert_eq!(h.float_slot(), 3);

    h.move_to(170.0);
    let s = h.shuffle();
    assert_eq!((s.first_expanded, s.second_expanded), (3, 4));
    assert!(approx(s.slide_fraction, 5.0 / 6.0));
    assert_eq!(h.float_slot(), 4);

    h.move_to(180.0);
    assert_eq!(h.shuffle(), ShuffleState::at(4));
    // Rows above the source open their gap above the content.
    h.move_to(60.0);
    let s = h.shuffle();
    assert!(s.first_expanded < 3);
    let above = h.engine.row_layout(&h.list, s.first_expanded);
    assert!(above.height > 40.0);
    assert_eq!(above.gravity, Gravity::Bottom);
}

#[test]
fn rendered_heights_conserve_content() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    for y in [150.0, 163.0, 175.0, 199.0, 90.0, 41.0] {
        h.move_to(y);
        let total: f64 = (0..10).map(|slot| h.engine.row_layout(&h.list, slot).height).sum();
        assert!(approx(total, 400.0), "total {total} at y {y}");
    }
}

#[test]
fn a_jump_resolves_in_one_pass() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();

    h.move_once(260.0);
    assert_eq!(h.float_slot(), 6);
    assert_eq!(*h.drags.borrow(), [(3, 6)]);
    assert_eq!(h.shuffle(), ShuffleState::at(6));

    h.move_once(20.0);
    assert_eq!(h.float_slot(), 0);
    assert_eq!(h.float_top(), 0.0);

    // The float never leaves the list.
    h.move_once(-100.0);
    assert_eq!(h.float_slot(), 0);
    assert_eq!(h.float_top(), 0.0);

    assert_eq!(
        h.release(-100.0),
        Some(DragOutcome::Dropped { from: 3, to: 0 })
    );
}

#[test]
fn headers_and_footers_bound_the_drag() {
    let list = RowStrip::uniform(10, 40.0, Size::new(320.0, 400.0))
        .with_headers(2)
        .with_footers(1);
    let mut h = Harness::new(list);

    h.press(60.0);
    assert_eq!(h.start(1, 20.0), Err(DragError::SlotNotDraggable(1)));
    assert_eq!(h.start(9, 20.0), Err(DragError::SlotNotDraggable(9)));
    assert!(!h.engine.is_dragging());

    h.press(180.0);
    h.start(4, 20.0).unwrap();

    h.move_to(-50.0);
    assert_eq!(h.float_slot(), 2);
    // Pinned below the last header.
    assert_eq!(h.float_top(), 80.0);

    h.move_to(1000.0);
    assert_eq!(h.float_slot(), 8);
    // Pinned to the bottom of the last draggable row.
    assert!(approx(h.engine.session().unwrap().floating_bounds().y1, 360.0));

    // Listener indices exclude headers.
    assert_eq!(*h.drags.borrow(), [(2, 0), (0, 6)]);
    assert_eq!(
        h.release(1000.0),
        Some(DragOutcome::Dropped { from: 2, to: 6 })
    );
}

#[test]
fn start_failures_change_nothing() {
    let mut h = Harness::ten_rows();
    assert_eq!(h.start(3, 20.0), Err(DragError::NoPointerInput));

    h.engine.set_drag_enabled(false);
    h.press(140.0);
    assert_eq!(h.start(3, 20.0), Err(DragError::DragDisabled));
    h.engine.set_drag_enabled(true);

    h.press(140.0);
    assert_eq!(h.start(10, 20.0), Err(DragError::SlotNotDraggable(10)));

    h.engine.renderer_mut().unwrap().decline = true;
    assert_eq!(h.start(3, 20.0), Err(DragError::RendererDeclined(3)));
    h.engine.renderer_mut().unwrap().decline = false;

    let mut bare: DragEngine<Recording> = DragEngine::new(ReorderConfig::default());
    bare.handle_pointer(&mut h.list, &PointerEvent::down(Point::new(10.0, 140.0), 1));
    assert_eq!(
        bare.start_drag(&mut h.list, 3, DragFlags::VERTICAL, Vec2::ZERO),
        Err(DragError::NoRenderer)
    );

    assert!(!h.engine.is_dragging());
    assert_eq!(h.engine.state(), EngineState::Idle);
    assert_eq!(h.engine.renderer().unwrap().created, 0);
}

#[test]
fn only_one_session_at_a_time() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    assert_eq!(h.start(5, 20.0), Err(DragError::AlreadyDragging));
    assert_eq!(h.engine.session().unwrap().source_slot(), 3);
    assert_eq!(h.engine.renderer().unwrap().created, 1);
}

#[test]
fn stopping_twice_is_harmless() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    assert_eq!(
        h.engine.stop_drag(&mut h.list, false),
        Ok(DragOutcome::Dropped { from: 3, to: 3 })
    );
    assert_eq!(
        h.engine.stop_drag(&mut h.list, false),
        Err(DragError::NotDragging)
    );
    assert_eq!(h.release(140.0), None);
    assert_eq!(*h.drops.borrow(), [(3, 3)]);
    assert_eq!(h.engine.renderer().unwrap().destroyed, 1);
}

#[test]
fn removal_reports_the_source() {
    let list = RowStrip::uniform(10, 40.0, Size::new(320.0, 400.0)).with_headers(1);
    let mut h = Harness::new(list);
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    h.move_to(220.0);
    assert_eq!(
        h.engine.stop_drag(&mut h.list, true),
        Ok(DragOutcome::Removed { slot: 2 })
    );
    assert_eq!(*h.removes.borrow(), [2]);
    assert!(h.drops.borrow().is_empty());
}

#[test]
fn cancel_stops_without_removal() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    h.move_to(200.0);
    let event = PointerEvent::cancel(Point::new(10.0, 200.0), 99);
    let outcome = h.engine.handle_pointer(&mut h.list, &event);
    assert!(matches!(outcome, Some(DragOutcome::Dropped { from: 3, .. })));
    assert!(!h.engine.in_pointer_sequence());
}

#[test]
fn data_change_with_stale_slots_cancels() {
    let mut h = Harness::ten_rows();
    h.press(340.0);
    h.start(8, 20.0).unwrap();
    h.list.remove_item(0);
    h.list.remove_item(0);
    assert_eq!(
        h.engine.data_set_changed(&mut h.list),
        Some(DragOutcome::Cancelled)
    );
    assert!(h.drops.borrow().is_empty());
    assert!(!h.engine.is_dragging());
    assert_eq!(h.engine.data_set_changed(&mut h.list), None);
}

#[test]
fn data_change_with_valid_slots_drops() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    h.move_to(220.0);
    assert_eq!(
        h.engine.data_set_changed(&mut h.list),
        Some(DragOutcome::Dropped { from: 3, to: 5 })
    );
}

#[test]
fn auto_scroll_up_stops_at_the_top() {
    let mut list = RowStrip::uniform(20, 40.0, Size::new(320.0, 400.0));
    list.scroll_to(0, -20.0);
    let mut h = Harness::new(list);

    h.press(5.0);
    h.start(0, 25.0).unwrap();
    assert_eq!(h.float_top(), 0.0);

    let event = PointerEvent::moved(Point::new(10.0, 2.0), 1000);
    h.engine.handle_pointer(&mut h.list, &event);
    h.list.flush(&mut h.engine);
    assert_eq!(
        h.engine.scroller().direction(),
        Some(understory_reorder::ScrollDirection::Up)
    );

    let mut now = 1000;
    let mut ticks = 0;
    let mut last_top = h.list.slot_bounds(0).unwrap().y0;
    while h.list.take_tick() {
        assert!(ticks < 20, "scroll loop did not terminate");
        now += 16;
        ticks += 1;
        h.engine.scroll_tick(&mut h.list, now);
        h.list.flush(&mut h.engine);
        let top = h.list.slot_bounds(0).unwrap().y0;
        assert!(top >= last_top);
        last_top = top;
    }
    assert!(ticks > 1);
    assert_eq!(h.list.slot_bounds(0).unwrap().y0, 0.0);
    assert!(!h.engine.scroller().is_scrolling());
    assert!(h.engine.is_dragging());
    assert_eq!(h.float_slot(), 0);
}

#[test]
fn drop_after_scrolling_keeps_content_in_place() {
    let mut h = Harness::new(RowStrip::uniform(20, 40.0, Size::new(320.0, 400.0)));
    h.press(60.0);
    h.start(1, 20.0).unwrap();

    let event = PointerEvent::moved(Point::new(10.0, 390.0), 1000);
    h.engine.handle_pointer(&mut h.list, &event);
    h.list.flush(&mut h.engine);
    assert_eq!(
        h.engine.scroller().direction(),
        Some(understory_reorder::ScrollDirection::Down)
    );

    let mut now = 1000;
    for _ in 0..40 {
        if !h.list.take_tick() {
            break;
        }
        now += 16;
        h.engine.scroll_tick(&mut h.list, now);
        h.list.flush(&mut h.engine);
    }
    let first = h.list.first_visible().unwrap();
    assert!(first > 1, "list did not scroll past the source");
    let top = h.list.slot_bounds(first).unwrap().y0;

    let outcome = h.release(390.0);
    let Some(DragOutcome::Dropped { from: 1, to }) = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert!(to > first);
    // The row above the old first visible row now sits where that row was.
    let anchored = h.list.slot_bounds(first - 1).unwrap().y0;
    assert!((anchored - top).abs() < 1e-6, "{anchored} != {top}");
}

#[test]
fn gap_dividers_sit_on_the_seam() {
    let list = RowStrip::uniform(10, 40.0, Size::new(320.0, 400.0)).with_divider(2.0);
    let mut h = Harness::new(list);
    let source_top = h.list.slot_bounds(3).unwrap().y0;
    h.press(source_top + 20.0);
    h.start(3, 20.0).unwrap();
    assert!(h.engine.gap_dividers(&h.list).is_empty());

    let mut y = source_top + 20.0;
    while !h.shuffle().is_sliding() {
        assert!(y < source_top + 100.0, "gap never started sliding");
        y += 2.0;
        h.move_to(y);
    }
    assert_eq!(h.shuffle().second_expanded, 4);
    let dividers = h.engine.gap_dividers(&h.list);
    assert_eq!(dividers.len(), 1);
    let seam = h.list.slot_bounds(4).unwrap().y0 + 40.0;
    assert!(approx(dividers[0].y0, seam));
    assert!(approx(dividers[0].height(), 2.0));
}

#[test]
fn renderer_swap_is_refused_mid_drag() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    let refused = h.engine.set_renderer(Recording::default());
    assert!(refused.is_some());
    assert_eq!(h.engine.renderer().unwrap().created, 1);
}

#[test]
fn disabling_mid_drag_lets_the_drag_finish() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    h.engine.set_drag_enabled(false);

    h.move_to(200.0);
    assert!(approx(h.float_top(), 180.0));

    let outcome = h.release(200.0);
    assert!(matches!(outcome, Some(DragOutcome::Dropped { from: 3, .. })));
    assert_eq!(h.drops.borrow().len(), 1);
    assert!(!h.engine.is_dragging());
    assert_eq!(h.engine.state(), EngineState::Idle);
    assert!(!h.engine.in_pointer_sequence());

    // New drags stay disabled.
    h.press(60.0);
    assert!(!h.engine.in_pointer_sequence());
    assert_eq!(h.start(1, 20.0), Err(DragError::DragDisabled));
}

#[test]
fn disabling_mid_drag_still_cancels() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    h.engine.set_drag_enabled(false);

    let time = h.tick_time();
    let cancel = PointerEvent::cancel(Point::new(10.0, 140.0), time);
    let outcome = h.engine.handle_pointer(&mut h.list, &cancel);
    assert_eq!(outcome, Some(DragOutcome::Dropped { from: 3, to: 3 }));
    assert!(!h.engine.is_dragging());
    assert!(!h.engine.in_pointer_sequence());
    assert_eq!(h.engine.renderer().unwrap().destroyed, 1);
}

#[test]
fn leaving_both_regions_destroys_the_scroll_loop() {
    let mut h = Harness::new(RowStrip::uniform(20, 40.0, Size::new(320.0, 400.0)));
    h.press(60.0);
    h.start(1, 20.0).unwrap();
    h.move_to(390.0);
    assert_eq!(
        h.engine.scroller().direction(),
        Some(understory_reorder::ScrollDirection::Down)
    );

    h.move_to(200.0);
    assert!(!h.engine.scroller().is_scrolling());
    assert!(h.engine.scroller().state().is_none());

    // The tick already posted finds no loop and does not re-arm.
    assert!(h.list.take_tick());
    let now = h.tick_time();
    assert!(!h.engine.scroll_tick(&mut h.list, now));
    assert!(!h.list.take_tick());
    assert!(h.engine.is_dragging());
}

#[test]
fn restart_within_a_frame_leaves_one_tick() {
    let mut h = Harness::new(RowStrip::uniform(20, 40.0, Size::new(320.0, 400.0)));
    h.press(60.0);
    h.start(1, 20.0).unwrap();
    h.move_to(390.0);
    h.move_to(200.0);
    h.move_to(390.0);
    assert!(h.engine.scroller().is_scrolling());

    assert!(h.list.take_tick());
    assert!(!h.list.take_tick());
}

#[test]
fn reversing_into_the_other_region_restarts_the_scroll() {
    let mut list = RowStrip::uniform(20, 40.0, Size::new(320.0, 400.0));
    list.scroll_to(5, 0.0);
    let mut h = Harness::new(list);
    h.press(220.0);
    h.start(10, 20.0).unwrap();

    h.move_to(390.0);
    assert_eq!(
        h.engine.scroller().direction(),
        Some(understory_reorder::ScrollDirection::Down)
    );

    h.move_to(5.0);
    let state = h.engine.scroller().state().copied().unwrap();
    assert_eq!(state.direction, understory_reorder::ScrollDirection::Up);
    // A fresh loop, started by this move.
    assert_eq!(state.start_time, h.time);
    assert!(approx(state.pending_offset, 0.0));
}

#[test]
fn custom_speed_profile_drives_the_scroll() {
    let seen: Rc<std::cell::Cell<Option<(f64, u64)>>> = Rc::default();
    let mut list = RowStrip::uniform(20, 40.0, Size::new(320.0, 400.0));
    list.scroll_to(5, 0.0);
    let mut h = Harness::new(list);
    {
        let seen = seen.clone();
        h.engine.set_speed_profile(move |depth: f64, elapsed: u64| {
            seen.set(Some((depth, elapsed)));
            0.5
        });
    }

    h.press(20.0);
    h.start(5, 20.0).unwrap();
    h.move_to(2.0);
    assert_eq!(
        h.engine.scroller().direction(),
        Some(understory_reorder::ScrollDirection::Up)
    );

    assert!(h.list.take_tick());
    let now = h.time + 10;
    assert!(h.engine.scroll_tick(&mut h.list, now));
    assert!(approx(h.engine.scroller().pending(), 5.0));
    let (depth, elapsed) = seen.get().unwrap();
    assert!(depth > 0.0 && depth <= 1.0, "depth {depth}");
    assert_eq!(elapsed, 10);
}

#[test]
fn headers_growing_mid_drag_keep_listener_slots_in_range() {
    let mut h = Harness::ten_rows();
    h.press(140.0);
    h.start(3, 20.0).unwrap();
    h.list.set_headers(4);

    for y in [180.0, 220.0, 260.0, 300.0, 340.0] {
        h.move_to(y);
    }
    assert!(h.engine.is_dragging());
    assert!(h.float_slot() >= 4);
    let drags = h.drags.borrow();
    assert!(!drags.is_empty());
    // Data indices against the new header count: rows 4..=9 map to 0..=5.
    assert!(drags.iter().all(|&(from, to)| from <= 5 && to <= 5), "{drags:?}");
}
