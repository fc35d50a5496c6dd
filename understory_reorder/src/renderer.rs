// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The floating item collaborator.

use kurbo::{Point, Size};

use crate::geometry::SlotGeometry;

/// Proposed or adjusted position of the floating item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Top-left corner of the floating item, list-local.
    pub origin: Point,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Produces, positions and tears down the detached copy of a dragged row.
///
/// The engine owns the floating representation for the lifetime of a drag
/// session and hands it back to [`destroy_float`](Self::destroy_float) when
/// the session ends.
pub trait FloatingItemRenderer {
    /// The floating representation.
    type Float;

    /// Creates a floating representation of `slot`, or declines with `None`.
    ///
    /// `slot` is a row index, headers included. It is visible when this is called.
    fn create_float(&mut self, slot: usize, geometry: &dyn SlotGeometry) -> Option<Self::Float>;

    /// Natural size of a floating representation.
    fn float_size(&self, float: &Self::Float) -> Size;

    /// Adjusts the proposed placement before the engine constrains it.
    ///
    /// The engine clamps the returned origin against its drag flags and the
    /// list bounds afterwards, so an adjustment may be overridden. Opacity is
    /// kept as returned.
    fn adjust(
        &mut self,
        float: &mut Self::Float,
        proposed: Placement,
        pointer: Point,
        geometry: &dyn SlotGeometry,
    ) -> Placement {
        let _ = (float, pointer, geometry);
        proposed
    }

    /// Releases a floating representation.
    fn destroy_float(&mut self, float: Self::Float) {
        let _ = float;
    }
}
