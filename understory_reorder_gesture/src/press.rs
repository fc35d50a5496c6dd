// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press tracking: where a press started, where it is now, and whether it
//! has left the touch-slop circle.
//!
//! ## Usage
//!
//! 1) Call [`PressState::start`] on pointer down.
//! 2) Call [`PressState::update`] on each move; it returns the delta since the last update.
//! 3) Query [`PressState::total_offset`] or [`PressState::beyond_slop`].
//! 4) Call [`PressState::end`] on release or cancel.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_reorder_gesture::press::PressState;
//!
//! let mut press = PressState::default();
//! press.start(Point::new(10.0, 20.0), 0);
//!
//! assert_eq!(press.update(Point::new(13.0, 24.0)), Some(Vec2::new(3.0, 4.0)));
//! assert!(!press.beyond_slop(8.0));
//! press.update(Point::new(10.0, 30.0));
//! assert!(press.beyond_slop(8.0));
//! ```

use kurbo::{Point, Vec2};

/// Tracks a single press.
#[derive(Debug, Clone, Default, Copy)]
pub struct PressState {
    /// Where the press went down.
    pub start_pos: Option<Point>,
    /// Last recorded pointer position.
    pub last_pos: Option<Point>,
    /// When the press went down.
    pub start_time: u64,
    left_slop: bool,
}

impl PressState {
    /// Starts tracking a press at `pos`.
    pub fn start(&mut self, pos: Point, time: u64) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.start_time = time;
        self.left_slop = false;
    }

    /// Records a new position, returning the movement since the last one.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Offset from the press position to `current_pos`.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Whether the pointer has ever been farther than `slop` from the press.
    ///
    /// Once left, the circle stays left for the rest of the press.
    pub fn beyond_slop(&mut self, slop: f64) -> bool {
        if !self.left_slop {
            if let (Some(start), Some(last)) = (self.start_pos, self.last_pos) {
                self.left_slop = (last - start).hypot() > slop;
            }
        }
        self.left_slop
    }

    /// Milliseconds since the press went down.
    #[must_use]
    pub fn held_for(&self, now: u64) -> u64 {
        now.saturating_sub(self.start_time)
    }

    /// Ends the press.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` while a press is tracked.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.start_pos.is_some()
    }
}
