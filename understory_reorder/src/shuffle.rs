// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shuffle edges: mapping the floating item's midpoint to a drop slot.
//!
//! A *shuffle edge* is the y-coordinate separating "drop into `p - 1`" from
//! "drop into `p`". Edges are computed as if the floating item were centered
//! over its source slot, so that the expanded insertion gap does not feed back
//! into the decision. [`ShuffleModel::resolve`] walks edges from a reference
//! slot until the midpoint is bracketed, then splits the span between the two
//! bracketing edges into three bands:
//!
//! - upper band: the gap slides between `target - 1` and `target`,
//! - middle band: the gap sits entirely at `target`,
//! - lower band: the gap slides between `target` and `target + 1`.
//!
//! [`ShuffleState::slide_fraction`] is the share of the gap held by the second
//! expanded slot. It runs `0.5 → 1` across the upper band and `0 → 0.5` across
//! the lower band, so it is continuous over band transitions and equals `0.5`
//! exactly on a shuffle edge.
//!
//! A midpoint lying exactly on an edge belongs to the lower-indexed slot.

use crate::error::GeometryFault;
use crate::geometry::{SlotGeometry, SlotGeometrySnapshot, draggable_range};
use crate::types::{Gravity, RowLayout};

/// Which slots currently hold the insertion gap.
///
/// `second_expanded` is either equal to `first_expanded` or one past it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShuffleState {
    /// Upper slot holding (part of) the gap.
    pub first_expanded: usize,
    /// Lower slot holding (part of) the gap.
    pub second_expanded: usize,
    /// Share of the gap held by `second_expanded`, in `[0, 1]`.
    pub slide_fraction: f64,
}

impl ShuffleState {
    /// Gap entirely at `slot`.
    #[must_use]
    pub const fn at(slot: usize) -> Self {
        Self {
            first_expanded: slot,
            second_expanded: slot,
            slide_fraction: 0.0,
        }
    }

    /// Returns `true` while the gap is split between two slots.
    #[must_use]
    pub fn is_sliding(&self) -> bool {
        self.first_expanded != self.second_expanded
    }

    fn is_expanded(&self, slot: usize) -> bool {
        slot == self.first_expanded || slot == self.second_expanded
    }
}

/// Output of one shuffle pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShuffleTarget {
    /// Slot the item would land in if dropped now.
    pub float_slot: usize,
    /// Gap placement derived for this pass.
    pub state: ShuffleState,
}

/// Per-session constants of the shuffle computation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShuffleModel {
    /// Slot the drag started from.
    pub source: usize,
    /// Height of the floating item.
    pub float_height: f64,
    /// Rendered height of the collapsed source row.
    pub collapsed_height: f64,
    /// Share of the edge-to-edge span used for partial slides.
    pub slide_region_fraction: f64,
}

enum Band {
    Upper(f64),
    Middle,
    Lower(f64),
}

impl ShuffleModel {
    /// Largest blank space a non-source slot may open.
    #[must_use]
    pub fn max_blank(&self) -> f64 {
        (self.float_height - self.collapsed_height).max(0.0)
    }

    /// Rendered height of `slot` under `state`.
    ///
    /// Header and footer slots, and slots not holding the gap, keep their
    /// natural height. The source collapses unless the gap sits on it.
    pub fn item_height<G: SlotGeometry + ?Sized>(
        &self,
        state: &ShuffleState,
        geometry: &G,
        slot: usize,
    ) -> f64 {
        let natural = natural_height(geometry, slot);
        if is_head_or_foot(geometry, slot) {
            return natural;
        }
        let max_blank = self.max_blank();
        let first_share = (1.0 - state.slide_fraction) * max_blank;
        let sliding = state.is_sliding();
        if slot == self.source {
            if slot == state.first_expanded {
                if sliding {
                    first_share + self.collapsed_height
                } else {
                    self.float_height
                }
            } else if slot == state.second_expanded {
                self.float_height - first_share
            } else {
                self.collapsed_height
            }
        } else if slot == state.first_expanded {
            natural + if sliding { first_share } else { max_blank }
        } else if slot == state.second_expanded {
            natural + max_blank - first_share
        } else {
            natural
        }
    }

    /// Full row layout of `slot` under `state`.
    pub fn row_layout<G: SlotGeometry + ?Sized>(
        &self,
        state: &ShuffleState,
        geometry: &G,
        slot: usize,
    ) -> RowLayout {
        let gravity = if state.is_expanded(slot) && slot < self.source {
            Gravity::Bottom
        } else {
            Gravity::Top
        };
        RowLayout {
            height: self.item_height(state, geometry, slot),
            gravity,
            content_visible: slot != self.source,
        }
    }

    /// Item and content heights of `slot` as currently laid out.
    ///
    /// On-screen slots report their actual bounds; others are derived from
    /// `state`.
    pub fn snapshot<G: SlotGeometry + ?Sized>(
        &self,
        state: &ShuffleState,
        geometry: &G,
        slot: usize,
    ) -> SlotGeometrySnapshot {
        let item_height = geometry
            .slot_bounds(slot)
            .map(|r| r.height())
            .unwrap_or_else(|| self.item_height(state, geometry, slot));
        self.snapshot_with_item(geometry, slot, item_height)
    }

    /// Heights of `slot` as they will be once laid out under `state`.
    pub fn derived_snapshot<G: SlotGeometry + ?Sized>(
        &self,
        state: &ShuffleState,
        geometry: &G,
        slot: usize,
    ) -> SlotGeometrySnapshot {
        let item_height = self.item_height(state, geometry, slot);
        self.snapshot_with_item(geometry, slot, item_height)
    }

    fn snapshot_with_item<G: SlotGeometry + ?Sized>(
        &self,
        geometry: &G,
        slot: usize,
        item_height: f64,
    ) -> SlotGeometrySnapshot {
        let child_height = if is_head_or_foot(geometry, slot) {
            item_height
        } else if slot == self.source {
            0.0
        } else {
            natural_height(geometry, slot)
        };
        SlotGeometrySnapshot {
            item_height,
            child_height,
        }
    }

    /// Shuffle edge of `slot` when its top is at `top`.
    pub fn shuffle_edge<G: SlotGeometry + ?Sized>(
        &self,
        state: &ShuffleState,
        geometry: &G,
        slot: usize,
        top: f64,
        heights: SlotGeometrySnapshot,
    ) -> f64 {
        let headers = geometry.header_count();
        let first_footer = geometry
            .slot_count()
            .saturating_sub(geometry.footer_count());
        if slot <= headers || slot >= first_footer {
            return top;
        }

        let max_blank = self.max_blank();
        let divider = geometry.divider_height();

        // Top of `slot` with the floating item centered over the source.
        let mut centered_top = top;
        if state.second_expanded <= self.source {
            if slot == state.second_expanded && state.is_sliding() {
                centered_top = if slot == self.source {
                    top + heights.item_height - self.float_height
                } else {
                    top + heights.blank_height() - max_blank
                };
            } else if slot > state.second_expanded && slot <= self.source {
                centered_top = top - max_blank;
            }
        } else if slot > self.source && slot <= state.first_expanded {
            centered_top = top + max_blank;
        } else if slot == state.second_expanded && state.is_sliding() {
            centered_top = top + heights.blank_height();
        }

        if slot <= self.source {
            let above = self.snapshot(state, geometry, slot - 1);
            centered_top + (self.float_height - divider - above.child_height) / 2.0
        } else {
            centered_top + (heights.child_height - divider - self.float_height) / 2.0
        }
    }

    /// Resolves the drop slot and gap placement for a floating midpoint.
    ///
    /// `state` is the placement the host last laid out; `pending_scroll` is a
    /// scroll offset that will be applied before the next layout.
    pub(crate) fn resolve<G: SlotGeometry + ?Sized>(
        &self,
        state: &ShuffleState,
        geometry: &G,
        float_mid: f64,
        pending_scroll: f64,
    ) -> Result<ShuffleTarget, GeometryFault> {
        let (lower, upper) = draggable_range(geometry)
            .ok_or(GeometryFault::NoVisibleSlots)?
            .into_inner();
        let first_visible = geometry
            .first_visible()
            .ok_or(GeometryFault::NoVisibleSlots)?;
        let last_visible = geometry
            .last_visible()
            .ok_or(GeometryFault::NoVisibleSlots)?;

        let start = if (first_visible..=last_visible).contains(&state.first_expanded) {
            state.first_expanded
        } else {
            first_visible + (last_visible.saturating_sub(first_visible) + 1) / 2
        };
        let start_bounds = geometry
            .slot_bounds(start)
            .ok_or(GeometryFault::MissingBounds(start))?;

        let divider = geometry.divider_height();
        let mut pos = start;
        let mut top = start_bounds.y0 + pending_scroll;
        let mut heights = self.snapshot(state, geometry, pos);
        let mut edge = self.shuffle_edge(state, geometry, pos, top, heights);
        let mut last_edge = edge;

        if float_mid <= edge {
            while float_mid <= edge && pos > lower {
                pos -= 1;
                heights = self.snapshot(state, geometry, pos);
                top -= heights.item_height + divider;
                last_edge = edge;
                edge = self.shuffle_edge(state, geometry, pos, top, heights);
            }
        } else {
            loop {
                if pos >= upper {
                    last_edge = edge;
                    edge = top + divider + heights.item_height;
                    break;
                }
                let next_top = top + heights.item_height + divider;
                let next_heights = self.snapshot(state, geometry, pos + 1);
                let next_edge = self.shuffle_edge(state, geometry, pos + 1, next_top, next_heights);
                if float_mid <= next_edge {
                    last_edge = edge;
                    edge = next_edge;
                    break;
                }
                pos += 1;
                top = next_top;
                heights = next_heights;
                edge = next_edge;
            }
        }

        let band = if self.slide_region_fraction > 0.0 {
            let (edge_top, edge_bottom) = if float_mid <= edge {
                (last_edge, edge)
            } else {
                (edge, last_edge)
            };
            let region = 0.5 * self.slide_region_fraction * (edge - last_edge).abs();
            let slide_top = edge_top + region;
            let slide_bottom = edge_bottom - region;
            if float_mid < slide_top {
                Band::Upper(if region > 0.0 {
                    0.5 + 0.5 * (float_mid - edge_top) / region
                } else {
                    0.5
                })
            } else if float_mid < slide_bottom {
                Band::Middle
            } else {
                Band::Lower(if region > 0.0 {
                    0.5 * (float_mid - slide_bottom) / region
                } else {
                    0.5
                })
            }
        } else {
            Band::Middle
        };

        let (first, second, fraction) = match band {
            Band::Upper(f) => (pos.checked_sub(1), pos, f),
            Band::Middle => (Some(pos), pos, 0.0),
            Band::Lower(f) => (Some(pos), pos + 1, f),
        };

        let target = match first {
            Some(first) if first >= lower && second <= upper => ShuffleTarget {
                float_slot: pos,
                state: ShuffleState {
                    first_expanded: first,
                    second_expanded: second,
                    slide_fraction: fraction.clamp(0.0, 1.0),
                },
            },
            Some(first) if first >= lower => ShuffleTarget {
                float_slot: upper,
                state: ShuffleState::at(upper),
            },
            _ => ShuffleTarget {
                float_slot: lower,
                state: ShuffleState::at(lower),
            },
        };
        Ok(target)
    }
}

/// Natural content height of `slot`, or zero if it cannot be measured.
pub(crate) fn natural_height<G: SlotGeometry + ?Sized>(geometry: &G, slot: usize) -> f64 {
    geometry.natural_height(slot).unwrap_or(0.0).max(0.0)
}

pub(crate) fn is_head_or_foot<G: SlotGeometry + ?Sized>(geometry: &G, slot: usize) -> bool {
    slot < geometry.header_count()
        || slot
            >= geometry
                .slot_count()
                .saturating_sub(geometry.footer_count())
}
