// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host list surface consumed by the engine.
//!
//! The engine never owns rows. It reads the host's current layout through
//! [`SlotGeometry`] and asks for changes through [`ListHost`]. Slots are row
//! indices *including* header and footer rows; visible slots form the
//! contiguous range `first_visible()..=last_visible()`.

use core::ops::{Deref, DerefMut, RangeInclusive};

use kurbo::{Insets, Rect, Size};

/// Read-only view of the host list's current layout.
pub trait SlotGeometry {
    /// Total number of slots, headers and footers included.
    fn slot_count(&self) -> usize;

    /// Number of leading header slots.
    fn header_count(&self) -> usize;

    /// Number of trailing footer slots.
    fn footer_count(&self) -> usize;

    /// First slot with at least one pixel on screen, or `None` if nothing is laid out.
    fn first_visible(&self) -> Option<usize>;

    /// Last slot with at least one pixel on screen, or `None` if nothing is laid out.
    fn last_visible(&self) -> Option<usize>;

    /// On-screen bounds of a visible slot, in list-local coordinates.
    ///
    /// Returns `None` for slots that are not currently laid out.
    fn slot_bounds(&self, slot: usize) -> Option<Rect>;

    /// Natural height of the slot's content, independent of any drag.
    ///
    /// Returns `None` if the slot cannot be measured; the engine then treats
    /// its content as zero height for the current pass.
    fn natural_height(&self, slot: usize) -> Option<f64>;

    /// Height of the divider drawn between adjacent rows.
    fn divider_height(&self) -> f64 {
        0.0
    }

    /// Size of the list viewport, padding included.
    fn viewport(&self) -> Size;

    /// Content padding inside the viewport.
    fn padding(&self) -> Insets {
        Insets::ZERO
    }
}

/// Mutating side of the host list.
pub trait ListHost: SlotGeometry {
    /// Ask the host to run a layout pass soon.
    ///
    /// Hosts must ignore this while layout requests are blocked.
    fn request_layout(&mut self);

    /// Block or unblock nested layout requests.
    ///
    /// The engine only calls this through [`LayoutGuard`].
    fn set_layout_blocked(&mut self, blocked: bool);

    /// Re-anchor the list so that `slot`'s top sits `offset` below the top padding.
    fn set_slot_top(&mut self, slot: usize, offset: f64);

    /// Schedule a deferred call to [`DragEngine::scroll_tick`](crate::DragEngine::scroll_tick).
    ///
    /// Hosts must coalesce posts: while a tick is pending, posting again is a
    /// no-op. A scroller stopped and restarted within one frame posts twice,
    /// and only one tick chain may be in flight.
    fn post_scroll_tick(&mut self);
}

/// Item and content heights of one slot, for one query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlotGeometrySnapshot {
    /// Rendered height of the whole row.
    pub item_height: f64,
    /// Height of the row's visible content; the rest is blank gap.
    pub child_height: f64,
}

impl SlotGeometrySnapshot {
    /// Height of the blank part of the row.
    #[must_use]
    pub fn blank_height(&self) -> f64 {
        self.item_height - self.child_height
    }
}

/// Slots that may be dragged or dropped onto: everything but headers and footers.
///
/// Returns `None` when the list has no such slot.
#[must_use]
pub fn draggable_range(geometry: &(impl SlotGeometry + ?Sized)) -> Option<RangeInclusive<usize>> {
    let count = geometry.slot_count();
    let lower = geometry.header_count();
    let reserved = lower.checked_add(geometry.footer_count())?;
    if count <= reserved {
        return None;
    }
    Some(lower..=count - geometry.footer_count() - 1)
}

/// Height of the list content area, viewport minus vertical padding.
#[must_use]
pub fn list_height(geometry: &(impl SlotGeometry + ?Sized)) -> f64 {
    let pad = geometry.padding();
    (geometry.viewport().height - pad.y0 - pad.y1).max(0.0)
}

/// Blocks nested layout requests on a host for as long as it lives.
///
/// Unblocks on drop, so every exit path of an internal pass releases it.
#[derive(Debug)]
pub struct LayoutGuard<'a, H: ListHost + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: ListHost + ?Sized> LayoutGuard<'a, H> {
    /// Blocks layout requests on `host`.
    pub fn new(host: &'a mut H) -> Self {
        host.set_layout_blocked(true);
        Self { host }
    }
}

impl<H: ListHost + ?Sized> Deref for LayoutGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: ListHost + ?Sized> DerefMut for LayoutGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: ListHost + ?Sized> Drop for LayoutGuard<'_, H> {
    fn drop(&mut self) {
        self.host.set_layout_blocked(false);
    }
}
