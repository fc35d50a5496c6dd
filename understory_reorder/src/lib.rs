// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reorder --heading-base-level=0

//! Understory Reorder: a headless drag-and-drop reordering engine for vertical lists.
//!
//! A user grabs a row, a floating copy follows the pointer, and the rows around
//! it open a gap where the item would land. When the pointer nears the top or
//! bottom of the viewport the list scrolls on its own. Releasing drops the item
//! into the gap; the host is told `(from, to)` and reorders its own data.
//!
//! The core concepts are:
//!
//! - [`SlotGeometry`] and [`ListHost`]: what the engine needs from the host
//!   list. Slots are row indices including headers and footers; the engine
//!   reads on-screen bounds and natural heights and asks for layouts, anchors
//!   and deferred scroll ticks.
//! - [`DragEngine`]: the state machine. It owns the single [`DragSession`],
//!   resolves the gap placement ([`ShuffleState`]) in
//!   [`DragEngine::layout_pass`] and reports outcomes as [`DragOutcome`]s.
//! - [`ShuffleModel`]: the shuffle-edge walk and the derived row heights.
//! - [`AutoScroller`]: edge-triggered scrolling driven by posted ticks, with a
//!   pluggable [`SpeedProfile`].
//! - [`FloatingItemRenderer`]: produces and adjusts the floating item.
//!   [`snapshot::SnapshotRenderer`] floats a captured image of the row.
//! - [`strip::RowStrip`]: an in-memory reference host.
//!
//! This crate does **not** draw anything, own list data or recognize gestures.
//! See `understory_reorder_gesture` for press, long-press and fling handling.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size, Vec2};
//! use understory_reorder::snapshot::SnapshotRenderer;
//! use understory_reorder::strip::RowStrip;
//! use understory_reorder::{DragEngine, DragFlags, DragOutcome, PointerEvent, ReorderConfig};
//!
//! // Ten 40 px rows in a 400 px viewport.
//! let mut list = RowStrip::uniform(10, 40.0, Size::new(320.0, 400.0));
//! let renderer = SnapshotRenderer::new(|_slot: usize, _bounds: Rect| Some(()));
//! let mut engine = DragEngine::with_renderer(ReorderConfig::default(), renderer);
//!
//! // Press on row 3 and start dragging it.
//! engine.handle_pointer(&mut list, &PointerEvent::down(Point::new(10.0, 140.0), 0));
//! engine
//!     .start_drag(&mut list, 3, DragFlags::VERTICAL, Vec2::new(10.0, 20.0))
//!     .unwrap();
//! list.flush(&mut engine);
//!
//! // Drag down past two rows, letting the list lay out after each move.
//! for (i, y) in [160.0, 180.0, 200.0, 220.0, 240.0].into_iter().enumerate() {
//!     engine.handle_pointer(&mut list, &PointerEvent::moved(Point::new(10.0, y), i as u64 + 1));
//!     list.flush(&mut engine);
//!     list.flush(&mut engine);
//! }
//!
//! let outcome = engine.handle_pointer(&mut list, &PointerEvent::up(Point::new(10.0, 240.0), 9));
//! assert_eq!(outcome, Some(DragOutcome::Dropped { from: 3, to: 5 }));
//! ```
//!
//! All geometry is list-local logical pixels in `f64`; times are host-supplied
//! milliseconds. This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod engine;
mod error;
mod geometry;
mod renderer;
mod scroll;
mod session;
mod shuffle;
mod types;

pub mod snapshot;
pub mod strip;

pub use config::{MAX_SCROLL_REGION_FRACTION, ReorderConfig, ScrollConfig};
pub use engine::DragEngine;
pub use error::DragError;
pub use geometry::{
    LayoutGuard, ListHost, SlotGeometry, SlotGeometrySnapshot, draggable_range, list_height,
};
pub use renderer::{FloatingItemRenderer, Placement};
pub use scroll::{
    AutoScroller, FloatExtent, LinearProfile, ScrollDirection, ScrollRegions, ScrollState,
    SpeedProfile,
};
pub use session::DragSession;
pub use shuffle::{ShuffleModel, ShuffleState, ShuffleTarget};
pub use types::{
    DragFlags, DragOutcome, EngineState, Gravity, PointerEvent, PointerPhase, RowLayout,
};
