// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reorder_gesture --heading-base-level=0

//! Understory Reorder Gesture: pointer gestures for the reordering engine.
//!
//! [`GestureTranslator`] sits between raw pointer events and an
//! [`understory_reorder::DragEngine`]. It decides when a press on a row's
//! handle becomes a drag and whether a release removes the item instead of
//! dropping it:
//!
//! - [`DragInitMode`]: start on press, after the pointer leaves the touch
//!   slop, or after a long press.
//! - [`RemoveMode`]: remove on a fast horizontal fling, or on release in the
//!   outer third of the list.
//! - [`HandleLocator`]: where each row's handle is. [`WholeRow`] makes the
//!   entire row grabbable.
//!
//! Smaller building blocks are public too: [`press::PressState`] tracks a
//! press against the touch slop and [`velocity::VelocityTracker`] estimates
//! release velocity.
//!
//! ## Example
//!
//! Flinging row 2 to the right removes it:
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use understory_reorder::snapshot::SnapshotRenderer;
//! use understory_reorder::strip::RowStrip;
//! use understory_reorder::{DragEngine, DragOutcome, PointerEvent, ReorderConfig};
//! use understory_reorder_gesture::{GestureConfig, GestureTranslator, RemoveMode, WholeRow};
//!
//! let mut list = RowStrip::uniform(10, 40.0, Size::new(320.0, 400.0));
//! let renderer = SnapshotRenderer::new(|_slot: usize, _bounds: Rect| Some(()));
//! let mut engine = DragEngine::with_renderer(ReorderConfig::default(), renderer);
//! let mut gestures =
//!     GestureTranslator::new(GestureConfig::default().with_removal(RemoveMode::FlingRight));
//!
//! let down = PointerEvent::down(Point::new(100.0, 100.0), 0);
//! gestures.handle(&mut engine, &mut list, &mut WholeRow, &down);
//! assert!(engine.is_dragging());
//!
//! // 60 px to the right in 100 ms.
//! for i in 1_u32..=5 {
//!     let at = Point::new(100.0 + 12.0 * f64::from(i), 100.0);
//!     let moved = PointerEvent::moved(at, u64::from(i) * 20);
//!     gestures.handle(&mut engine, &mut list, &mut WholeRow, &moved);
//!     list.flush(&mut engine);
//! }
//! let up = PointerEvent::up(Point::new(160.0, 100.0), 100);
//! let outcome = gestures.handle(&mut engine, &mut list, &mut WholeRow, &up);
//! assert_eq!(outcome, Some(DragOutcome::Removed { slot: 2 }));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod config;
mod handle;
mod translator;

pub mod press;
pub mod velocity;

pub use config::{
    DEFAULT_FLING_SPEED, DEFAULT_LONG_PRESS_MS, DEFAULT_TOUCH_SLOP, DragInitMode, GestureConfig,
    RemoveMode,
};
pub use handle::{HandleHit, HandleLocator, WholeRow, hit_handle};
pub use translator::GestureTranslator;
