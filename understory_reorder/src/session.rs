// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The active drag session and its pointer and float bookkeeping.

use kurbo::{Point, Rect, Size, Vec2};

use crate::config::ReorderConfig;
use crate::shuffle::{ShuffleModel, ShuffleState};
use crate::types::DragFlags;

/// The single active drag.
///
/// Created by [`DragEngine::start_drag`](crate::DragEngine::start_drag) and
/// destroyed when the drag stops. Slots are row indices, headers included.
#[derive(Debug)]
pub struct DragSession<F> {
    pub(crate) source: usize,
    pub(crate) float_slot: usize,
    pub(crate) pointer_offset: Vec2,
    pub(crate) flags: DragFlags,
    pub(crate) float: F,
    pub(crate) float_size: Size,
    pub(crate) origin: Point,
    pub(crate) opacity: f64,
    pub(crate) shuffle: ShuffleState,
}

impl<F> DragSession<F> {
    /// Slot the drag started from.
    #[must_use]
    pub fn source_slot(&self) -> usize {
        self.source
    }

    /// Slot the item would land in if dropped now.
    #[must_use]
    pub fn float_slot(&self) -> usize {
        self.float_slot
    }

    /// Offset of the initial pointer position inside the floating item.
    #[must_use]
    pub fn pointer_offset(&self) -> Vec2 {
        self.pointer_offset
    }

    /// Motion permitted to the floating item.
    #[must_use]
    pub fn flags(&self) -> DragFlags {
        self.flags
    }

    /// The renderer's floating representation.
    #[must_use]
    pub fn float(&self) -> &F {
        &self.float
    }

    /// Current bounds of the floating item, list-local.
    #[must_use]
    pub fn floating_bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.float_size)
    }

    /// Current opacity of the floating item.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Gap placement from the last layout pass.
    #[must_use]
    pub fn shuffle(&self) -> &ShuffleState {
        &self.shuffle
    }

    /// Vertical midpoint of the floating item.
    #[must_use]
    pub fn float_mid(&self) -> f64 {
        self.origin.y + self.float_size.height / 2.0
    }

    pub(crate) fn model(&self, config: &ReorderConfig) -> ShuffleModel {
        ShuffleModel {
            source: self.source,
            float_height: self.float_size.height,
            collapsed_height: config.collapsed_height(),
            slide_region_fraction: config.slide_region_fraction(),
        }
    }
}
