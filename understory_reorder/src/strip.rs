// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory reference host: a vertical strip of rows with natural heights.
//!
//! [`RowStrip`] implements [`ListHost`] without any UI toolkit. It keeps an
//! anchor (a slot and the y of its top edge) the way a scrolling list keeps
//! its first visible row, lays every row out top to bottom from the anchor,
//! and clamps the result so content never scrolls past its ends. Layout
//! requests and posted scroll ticks are recorded as flags for the embedder to
//! service.
//!
//! ```rust
//! use kurbo::Size;
//! use understory_reorder::strip::RowStrip;
//! use understory_reorder::SlotGeometry;
//!
//! // 100 rows of 20 px in a 200 px viewport.
//! let mut strip = RowStrip::uniform(100, 20.0, Size::new(320.0, 200.0));
//! assert_eq!(strip.first_visible(), Some(0));
//! assert_eq!(strip.last_visible(), Some(9));
//!
//! // Scroll so row 50 starts 5 px below the top.
//! strip.scroll_to(50, 5.0);
//! assert_eq!(strip.first_visible(), Some(49));
//! assert_eq!(strip.slot_bounds(50).unwrap().y0, 5.0);
//! ```

use alloc::vec::Vec;

use kurbo::{Insets, Rect, Size};

use crate::engine::DragEngine;
use crate::geometry::{ListHost, SlotGeometry};
use crate::renderer::FloatingItemRenderer;
use crate::types::RowLayout;

/// A laid-out, visible row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedRow {
    /// Slot index, headers included.
    pub slot: usize,
    /// On-screen bounds.
    pub bounds: Rect,
    /// Layout the row was given.
    pub layout: RowLayout,
}

/// Reference [`ListHost`] over a strip of rows.
#[derive(Clone, Debug)]
pub struct RowStrip {
    heights: Vec<f64>,
    headers: usize,
    footers: usize,
    viewport: Size,
    padding: Insets,
    divider: f64,
    anchor_slot: usize,
    anchor_top: f64,
    rows: Vec<PlacedRow>,
    layout_requested: bool,
    layout_blocked: bool,
    tick_posted: bool,
}

impl RowStrip {
    /// Creates a strip with the given natural row heights, scrolled to the top.
    #[must_use]
    pub fn new(heights: impl IntoIterator<Item = f64>, viewport: Size) -> Self {
        let mut strip = Self {
            heights: heights.into_iter().map(|h| h.max(0.0)).collect(),
            headers: 0,
            footers: 0,
            viewport,
            padding: Insets::ZERO,
            divider: 0.0,
            anchor_slot: 0,
            anchor_top: 0.0,
            rows: Vec::new(),
            layout_requested: false,
            layout_blocked: false,
            tick_posted: false,
        };
        strip.arrange_natural();
        strip
    }

    /// Creates a strip of `count` rows of equal height.
    #[must_use]
    pub fn uniform(count: usize, height: f64, viewport: Size) -> Self {
        Self::new(core::iter::repeat_n(height, count), viewport)
    }

    /// Treats the first `count` rows as headers.
    #[must_use]
    pub fn with_headers(mut self, count: usize) -> Self {
        self.headers = count;
        self
    }

    /// Treats the last `count` rows as footers.
    #[must_use]
    pub fn with_footers(mut self, count: usize) -> Self {
        self.footers = count;
        self
    }

    /// Sets content padding and scrolls back to the top.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self.anchor_slot = 0;
        self.anchor_top = padding.y0;
        self.arrange_natural();
        self
    }

    /// Sets the divider height between rows.
    #[must_use]
    pub fn with_divider(mut self, divider: f64) -> Self {
        self.divider = divider.max(0.0);
        self.arrange_natural();
        self
    }

    /// Natural row heights.
    #[must_use]
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Rows laid out by the last arrangement, top to bottom.
    #[must_use]
    pub fn placed_rows(&self) -> &[PlacedRow] {
        &self.rows
    }

    /// Whether a layout pass was requested since the last arrangement.
    #[must_use]
    pub fn is_layout_requested(&self) -> bool {
        self.layout_requested
    }

    /// Whether layout requests are currently blocked.
    #[must_use]
    pub fn is_layout_blocked(&self) -> bool {
        self.layout_blocked
    }

    /// Consumes a posted scroll tick, returning whether one was pending.
    pub fn take_tick(&mut self) -> bool {
        core::mem::take(&mut self.tick_posted)
    }

    /// Scrolls so `slot`'s top sits `offset` below the top padding, with natural heights.
    pub fn scroll_to(&mut self, slot: usize, offset: f64) {
        self.set_slot_top(slot, offset);
        self.arrange_natural();
    }

    /// Lays rows out at their natural heights.
    pub fn arrange_natural(&mut self) {
        let layouts: Vec<RowLayout> = self.heights.iter().map(|&h| RowLayout::natural(h)).collect();
        self.arrange_layouts(&layouts);
    }

    /// Lays rows out with the engine's row layouts.
    pub fn arrange<R: FloatingItemRenderer>(&mut self, engine: &DragEngine<R>) {
        let layouts: Vec<RowLayout> = (0..self.heights.len())
            .map(|slot| engine.row_layout(&*self, slot))
            .collect();
        self.arrange_layouts(&layouts);
    }

    /// Runs the engine's layout pass, then arranges rows with its layouts.
    pub fn layout<R: FloatingItemRenderer>(&mut self, engine: &mut DragEngine<R>) {
        engine.layout_pass(self);
        self.arrange(engine);
    }

    /// Runs [`layout`](Self::layout) if one was requested. Returns whether it ran.
    pub fn flush<R: FloatingItemRenderer>(&mut self, engine: &mut DragEngine<R>) -> bool {
        if !self.layout_requested {
            return false;
        }
        self.layout(engine);
        true
    }

    /// Moves the data item at `from` to `to`; indices exclude headers.
    ///
    /// Returns `false` if either index is out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let (Some(from), Some(to)) = (self.data_slot(from), self.data_slot(to)) else {
            return false;
        };
        let h = self.heights.remove(from);
        self.heights.insert(to, h);
        self.arrange_natural();
        true
    }

    /// Removes the data item at `index`; the index excludes headers.
    ///
    /// Returns the removed natural height.
    pub fn remove_item(&mut self, index: usize) -> Option<f64> {
        let slot = self.data_slot(index)?;
        let h = self.heights.remove(slot);
        self.arrange_natural();
        Some(h)
    }

    /// Replaces all natural heights, keeping header and footer counts.
    pub fn set_heights(&mut self, heights: impl IntoIterator<Item = f64>) {
        self.heights = heights.into_iter().map(|h| h.max(0.0)).collect();
        self.arrange_natural();
    }

    /// Reclassifies the first `count` rows as headers.
    ///
    /// Row heights and placement are unchanged; an engine mid-drag learns of
    /// the change on its next layout pass.
    pub fn set_headers(&mut self, count: usize) {
        self.headers = count;
    }

    fn data_slot(&self, index: usize) -> Option<usize> {
        let slot = index.checked_add(self.headers)?;
        let end = self.heights.len().checked_sub(self.footers)?;
        (slot < end).then_some(slot)
    }

    fn arrange_layouts(&mut self, layouts: &[RowLayout]) {
        self.rows.clear();
        self.layout_requested = false;
        let count = layouts.len();
        if count == 0 {
            self.anchor_slot = 0;
            self.anchor_top = self.padding.y0;
            return;
        }
        let anchor = self.anchor_slot.min(count - 1);
        let divider = self.divider;
        let above: f64 = layouts[..anchor].iter().map(|l| l.height + divider).sum();
        let total: f64 =
            layouts.iter().map(|l| l.height).sum::<f64>() + divider * (count - 1) as f64;

        let pad_top = self.padding.y0;
        let content_bottom = self.viewport.height - self.padding.y1;
        let lowest_start = (content_bottom - total).min(pad_top);
        let start = (self.anchor_top - above).min(pad_top).max(lowest_start);

        let left = self.padding.x0;
        let right = self.viewport.width - self.padding.x1;
        let mut y = start;
        for (slot, layout) in layouts.iter().enumerate() {
            let top = y;
            let bottom = y + layout.height;
            if bottom > 0.0 && top < self.viewport.height {
                self.rows.push(PlacedRow {
                    slot,
                    bounds: Rect::new(left, top, right, bottom),
                    layout: *layout,
                });
            }
            y = bottom + divider;
        }
        match self.rows.first() {
            Some(first) => {
                self.anchor_slot = first.slot;
                self.anchor_top = first.bounds.y0;
            }
            None => {
                self.anchor_slot = anchor;
                self.anchor_top = start + above;
            }
        }
    }
}

impl SlotGeometry for RowStrip {
    fn slot_count(&self) -> usize {
        self.heights.len()
    }

    fn header_count(&self) -> usize {
        self.headers
    }

    fn footer_count(&self) -> usize {
        self.footers
    }

    fn first_visible(&self) -> Option<usize> {
        self.rows.first().map(|r| r.slot)
    }

    fn last_visible(&self) -> Option<usize> {
        self.rows.last().map(|r| r.slot)
    }

    fn slot_bounds(&self, slot: usize) -> Option<Rect> {
        let first = self.rows.first()?.slot;
        self.rows.get(slot.checked_sub(first)?).map(|r| r.bounds)
    }

    fn natural_height(&self, slot: usize) -> Option<f64> {
        self.heights.get(slot).copied()
    }

    fn divider_height(&self) -> f64 {
        self.divider
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn padding(&self) -> Insets {
        self.padding
    }
}

impl ListHost for RowStrip {
    fn request_layout(&mut self) {
        if !self.layout_blocked {
            self.layout_requested = true;
        }
    }

    fn set_layout_blocked(&mut self, blocked: bool) {
        self.layout_blocked = blocked;
    }

    fn set_slot_top(&mut self, slot: usize, offset: f64) {
        self.anchor_slot = slot;
        self.anchor_top = self.padding.y0 + offset;
    }

    fn post_scroll_tick(&mut self) {
        self.tick_posted = true;
    }
}
