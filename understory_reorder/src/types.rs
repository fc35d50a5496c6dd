// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public value types shared by the engine, its hosts and its collaborators.

use kurbo::Point;

bitflags::bitflags! {
    /// Directions in which the floating item may leave its source row's bounds.
    ///
    /// Vertical flags let the floating item travel past the source row toward
    /// the header/footer limits; horizontal flags let it move away from the
    /// list's left padding. Motion not permitted by a flag is clamped.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DragFlags: u8 {
        /// Floating item may move toward smaller y.
        const UP    = 0b0000_0001;
        /// Floating item may move toward larger y.
        const DOWN  = 0b0000_0010;
        /// Floating item may move toward smaller x.
        const LEFT  = 0b0000_0100;
        /// Floating item may move toward larger x.
        const RIGHT = 0b0000_1000;
        /// Both vertical directions; what sorting needs.
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
    }
}

/// Lifecycle of the engine.
///
/// `Stopped` is only observable while a stop is in progress, e.g. from inside a
/// drop or remove listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    /// No drag session exists.
    #[default]
    Idle,
    /// A drag session is active.
    Dragging,
    /// The active session is being torn down.
    Stopped,
}

/// Where a row's content sits inside its (possibly expanded) rendered height.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Gravity {
    /// Content is pinned to the top; extra space opens below it.
    #[default]
    Top,
    /// Content is pinned to the bottom; extra space opens above it.
    Bottom,
}

/// Rendered layout of one row while a drag is active.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RowLayout {
    /// Total rendered height of the row.
    pub height: f64,
    /// Alignment of the row content inside `height`.
    pub gravity: Gravity,
    /// Whether the row's own content should be drawn.
    ///
    /// `false` for the source row, whose content travels with the floating item.
    pub content_visible: bool,
}

impl RowLayout {
    /// Layout of a row that is not affected by any drag.
    #[must_use]
    pub const fn natural(height: f64) -> Self {
        Self {
            height,
            gravity: Gravity::Top,
            content_visible: true,
        }
    }
}

/// Result of a successful [`stop_drag`](crate::DragEngine::stop_drag).
///
/// Slot indices are header-adjusted, i.e. they index the host's data rather
/// than its rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragOutcome {
    /// The item should move from `from` to `to`.
    Dropped {
        /// Data index the drag started from.
        from: usize,
        /// Data index the item would land at.
        to: usize,
    },
    /// The item should be removed.
    Removed {
        /// Data index of the removed item.
        slot: usize,
    },
    /// The session ended without a reorder request.
    Cancelled,
}

/// Phase of a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Pointer pressed.
    Down,
    /// Pointer moved while pressed.
    Move,
    /// Pointer released.
    Up,
    /// Pointer sequence cancelled by the platform.
    Cancel,
}

/// A pointer event in list-local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub phase: PointerPhase,
    /// Where it happened, relative to the list's top-left corner.
    pub position: Point,
    /// Host timestamp in milliseconds.
    pub time: u64,
}

impl PointerEvent {
    /// Creates a new pointer event.
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Point, time: u64) -> Self {
        Self {
            phase,
            position,
            time,
        }
    }

    /// Shorthand for a [`PointerPhase::Down`] event.
    #[must_use]
    pub const fn down(position: Point, time: u64) -> Self {
        Self::new(PointerPhase::Down, position, time)
    }

    /// Shorthand for a [`PointerPhase::Move`] event.
    #[must_use]
    pub const fn moved(position: Point, time: u64) -> Self {
        Self::new(PointerPhase::Move, position, time)
    }

    /// Shorthand for a [`PointerPhase::Up`] event.
    #[must_use]
    pub const fn up(position: Point, time: u64) -> Self {
        Self::new(PointerPhase::Up, position, time)
    }

    /// Shorthand for a [`PointerPhase::Cancel`] event.
    #[must_use]
    pub const fn cancel(position: Point, time: u64) -> Self {
        Self::new(PointerPhase::Cancel, position, time)
    }

    /// Returns `true` for release and cancel events.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self.phase, PointerPhase::Up | PointerPhase::Cancel)
    }
}
