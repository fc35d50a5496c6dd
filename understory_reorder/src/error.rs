// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rejections from drag operations and faults in host geometry.

use core::fmt;

/// Why a drag operation was rejected.
///
/// None of these are faults: they are user-input rejections, and the engine is
/// left exactly as it was before the call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragError {
    /// Dragging is disabled on this engine.
    DragDisabled,
    /// No pointer sequence is in progress.
    NoPointerInput,
    /// A drag session is already active.
    AlreadyDragging,
    /// There is no drag session to stop.
    NotDragging,
    /// The slot is a header, a footer, out of range or not visible.
    SlotNotDraggable(usize),
    /// No floating item renderer is installed.
    NoRenderer,
    /// The renderer declined to produce a floating item for the slot.
    RendererDeclined(usize),
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DragDisabled => f.write_str("dragging is disabled"),
            Self::NoPointerInput => f.write_str("no pointer sequence in progress"),
            Self::AlreadyDragging => f.write_str("a drag is already in progress"),
            Self::NotDragging => f.write_str("no drag in progress"),
            Self::SlotNotDraggable(slot) => write!(f, "slot {slot} cannot be dragged"),
            Self::NoRenderer => f.write_str("no floating item renderer installed"),
            Self::RendererDeclined(slot) => {
                write!(f, "renderer declined to float slot {slot}")
            }
        }
    }
}

impl core::error::Error for DragError {}

/// Host geometry that could not be resolved during a layout pass.
///
/// Never surfaced: a pass that hits one of these is skipped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum GeometryFault {
    NoVisibleSlots,
    MissingBounds(usize),
}

impl fmt::Display for GeometryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoVisibleSlots => f.write_str("host reports no visible slots"),
            Self::MissingBounds(slot) => write!(f, "no on-screen bounds for slot {slot}"),
        }
    }
}
