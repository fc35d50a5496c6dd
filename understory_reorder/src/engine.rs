// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag engine state machine.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::config::ReorderConfig;
use crate::error::DragError;
use crate::geometry::{LayoutGuard, ListHost, SlotGeometry, draggable_range, list_height};
use crate::renderer::{FloatingItemRenderer, Placement};
use crate::scroll::{AutoScroller, FloatExtent, ScrollDirection, ScrollRegions, SpeedProfile};
use crate::session::DragSession;
use crate::shuffle::{ShuffleModel, ShuffleState, natural_height};
use crate::types::{DragFlags, DragOutcome, EngineState, PointerEvent, PointerPhase, RowLayout};

type DragListener = Box<dyn FnMut(usize, usize)>;
type RemoveListener = Box<dyn FnMut(usize)>;

#[derive(Default)]
struct Listeners {
    drag: Option<DragListener>,
    drop: Option<DragListener>,
    remove: Option<RemoveListener>,
}

/// Drives a single drag-to-reorder session over a host list.
///
/// The engine owns the active [`DragSession`], the [`ShuffleState`] derived
/// from it and the [`AutoScroller`]. It never touches the host's data: drops
/// and removals are reported through listeners and [`DragOutcome`]s with
/// header-adjusted indices, and the host reorders its own collection.
///
/// The host is passed by reference to every operation that needs it. A typical
/// host loop:
///
/// 1. Feed pointer events through [`track_pointer`](Self::track_pointer), a
///    gesture layer that may call [`start_drag`](Self::start_drag), then
///    [`drive_pointer`](Self::drive_pointer).
/// 2. Whenever a layout was requested, call [`layout_pass`](Self::layout_pass)
///    and lay rows out with [`row_layout`](Self::row_layout).
/// 3. Run posted ticks through [`scroll_tick`](Self::scroll_tick).
pub struct DragEngine<R: FloatingItemRenderer> {
    config: ReorderConfig,
    renderer: Option<R>,
    session: Option<DragSession<R::Float>>,
    state: EngineState,
    scroller: AutoScroller,
    pointer: Option<Point>,
    last_pointer_y: f64,
    in_pointer_sequence: bool,
    drag_enabled: bool,
    float_alpha: f64,
    listeners: Listeners,
}

impl<R: FloatingItemRenderer> fmt::Debug for DragEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("has_renderer", &self.renderer.is_some())
            .field("source", &self.session.as_ref().map(|s| s.source))
            .field("float_slot", &self.session.as_ref().map(|s| s.float_slot))
            .field("scroller", &self.scroller)
            .field("pointer", &self.pointer)
            .field("last_pointer_y", &self.last_pointer_y)
            .field("in_pointer_sequence", &self.in_pointer_sequence)
            .field("drag_enabled", &self.drag_enabled)
            .field("float_alpha", &self.float_alpha)
            .finish_non_exhaustive()
    }
}

impl<R: FloatingItemRenderer> DragEngine<R> {
    /// Creates an idle engine without a renderer.
    #[must_use]
    pub fn new(config: ReorderConfig) -> Self {
        Self {
            scroller: AutoScroller::new(*config.scroll()),
            float_alpha: config.float_alpha(),
            config,
            renderer: None,
            session: None,
            state: EngineState::Idle,
            pointer: None,
            last_pointer_y: 0.0,
            in_pointer_sequence: false,
            drag_enabled: true,
            listeners: Listeners::default(),
        }
    }

    /// Creates an idle engine using `renderer` for floating items.
    #[must_use]
    pub fn with_renderer(config: ReorderConfig, renderer: R) -> Self {
        let mut engine = Self::new(config);
        engine.renderer = Some(renderer);
        engine
    }

    /// Installs a renderer, returning the previous one.
    ///
    /// Ignored while dragging, since the live floating item belongs to the
    /// installed renderer.
    pub fn set_renderer(&mut self, renderer: R) -> Option<R> {
        if self.session.is_some() {
            return Some(renderer);
        }
        self.renderer.replace(renderer)
    }

    /// The installed renderer.
    #[must_use]
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// The installed renderer, mutably.
    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.renderer.as_mut()
    }

    /// Called with `(from, to)` whenever the drop slot changes.
    pub fn set_drag_listener(&mut self, listener: impl FnMut(usize, usize) + 'static) {
        self.listeners.drag = Some(Box::new(listener));
    }

    /// Called with `(from, to)` when a drag ends in a drop.
    pub fn set_drop_listener(&mut self, listener: impl FnMut(usize, usize) + 'static) {
        self.listeners.drop = Some(Box::new(listener));
    }

    /// Called with the removed data index when a drag ends in a removal.
    pub fn set_remove_listener(&mut self, listener: impl FnMut(usize) + 'static) {
        self.listeners.remove = Some(Box::new(listener));
    }

    /// Replaces the auto-scroll speed profile.
    pub fn set_speed_profile(&mut self, profile: impl SpeedProfile + 'static) {
        self.scroller.set_profile(profile);
    }

    /// Enables or disables dragging.
    ///
    /// While disabled, drags cannot start and pointer events outside a drag
    /// are ignored. An active drag is not interrupted: it still follows the
    /// pointer and ends on release or cancel.
    pub fn set_drag_enabled(&mut self, enabled: bool) {
        self.drag_enabled = enabled;
    }

    /// Whether dragging is enabled.
    #[must_use]
    pub fn is_drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns `true` while a drag session is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The active session.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession<R::Float>> {
        self.session.as_ref()
    }

    /// Gap placement of the active session.
    #[must_use]
    pub fn shuffle_state(&self) -> Option<ShuffleState> {
        self.session.as_ref().map(|s| s.shuffle)
    }

    /// The auto-scroller.
    #[must_use]
    pub fn scroller(&self) -> &AutoScroller {
        &self.scroller
    }

    /// Last observed pointer position.
    #[must_use]
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Whether a pointer sequence is in progress.
    #[must_use]
    pub fn in_pointer_sequence(&self) -> bool {
        self.in_pointer_sequence
    }

    /// Base opacity applied to new floating placements.
    #[must_use]
    pub fn float_alpha(&self) -> f64 {
        self.float_alpha
    }

    /// Overrides the base opacity until the pointer sequence ends.
    pub fn set_float_alpha(&mut self, alpha: f64) {
        self.float_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Records the pointer position of an event.
    ///
    /// Call for every event before any gesture layer sees it.
    pub fn track_pointer(&mut self, event: &PointerEvent) {
        if !self.drag_enabled && self.session.is_none() && !self.in_pointer_sequence {
            return;
        }
        let y = event.position.y;
        self.last_pointer_y = match (event.phase, self.pointer) {
            (PointerPhase::Down, _) | (_, None) => y,
            (_, Some(previous)) => previous.y,
        };
        self.pointer = Some(event.position);
        if event.phase == PointerPhase::Down {
            self.in_pointer_sequence = true;
        }
    }

    /// Applies an event to the active drag.
    ///
    /// Moves continue the drag; release and cancel stop it without removal and
    /// end the pointer sequence. Returns the outcome if a drag was stopped.
    pub fn drive_pointer<H: ListHost>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
    ) -> Option<DragOutcome> {
        match event.phase {
            PointerPhase::Down => None,
            PointerPhase::Move => {
                if self.session.is_some() {
                    let _ = self.continue_drag(host, event.position, event.time);
                }
                None
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                let outcome = self.stop_drag(host, false).ok();
                self.end_pointer_sequence();
                outcome
            }
        }
    }

    /// [`track_pointer`](Self::track_pointer) followed by [`drive_pointer`](Self::drive_pointer).
    pub fn handle_pointer<H: ListHost>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
    ) -> Option<DragOutcome> {
        self.track_pointer(event);
        self.drive_pointer(host, event)
    }

    fn end_pointer_sequence(&mut self) {
        self.in_pointer_sequence = false;
        self.float_alpha = self.config.float_alpha();
    }

    /// Starts dragging `slot`.
    ///
    /// `pointer_offset` is the pointer position minus the floating item's
    /// top-left corner. The slot must be draggable and visible, a pointer
    /// sequence must be in progress and the renderer must produce a floating
    /// item. On failure nothing changes.
    pub fn start_drag<H: ListHost>(
        &mut self,
        host: &mut H,
        slot: usize,
        flags: DragFlags,
        pointer_offset: Vec2,
    ) -> Result<(), DragError> {
        if !self.drag_enabled {
            return Err(DragError::DragDisabled);
        }
        let pointer = match self.pointer {
            Some(p) if self.in_pointer_sequence => p,
            _ => return Err(DragError::NoPointerInput),
        };
        if self.session.is_some() {
            return Err(DragError::AlreadyDragging);
        }
        let draggable = draggable_range(&*host).is_some_and(|r| r.contains(&slot));
        if !draggable || host.slot_bounds(slot).is_none() {
            return Err(DragError::SlotNotDraggable(slot));
        }
        let renderer = self.renderer.as_mut().ok_or(DragError::NoRenderer)?;
        let float = renderer
            .create_float(slot, &*host)
            .ok_or(DragError::RendererDeclined(slot))?;
        let float_size = renderer.float_size(&float);

        let mut session = DragSession {
            source: slot,
            float_slot: slot,
            pointer_offset,
            flags,
            float,
            float_size,
            origin: Point::ZERO,
            opacity: self.float_alpha,
            shuffle: ShuffleState::at(slot),
        };
        session.origin = constrain_origin(&session, &*host, pointer - pointer_offset);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "drag started",
            slot,
            height = float_size.height,
            offset_y = pointer_offset.y
        );

        self.session = Some(session);
        self.state = EngineState::Dragging;
        host.request_layout();
        Ok(())
    }

    /// Moves the floating item to follow the pointer.
    ///
    /// The proposal goes through the renderer and is then constrained. The
    /// drop slot itself is recomputed by the next [`layout_pass`](Self::layout_pass),
    /// which this requests. Also starts, reverses or stops auto-scrolling.
    pub fn continue_drag<H: ListHost>(
        &mut self,
        host: &mut H,
        pointer: Point,
        time: u64,
    ) -> Result<(), DragError> {
        if self.session.is_none() {
            return Err(DragError::NotDragging);
        }
        self.drag_float(&*host, pointer);
        host.request_layout();

        let Some(extent) = self.float_extent(pointer.y) else {
            return Ok(());
        };
        let regions = ScrollRegions::new(self.scroller.config(), &*host);
        let (min_y, max_y) = (extent.min_y(), extent.max_y());
        let direction = self.scroller.direction();
        let started = if min_y > self.last_pointer_y
            && min_y > regions.down_start
            && direction != Some(ScrollDirection::Down)
        {
            self.scroller.start(ScrollDirection::Down, time)
        } else if max_y < self.last_pointer_y
            && max_y < regions.up_start
            && direction != Some(ScrollDirection::Up)
        {
            self.scroller.start(ScrollDirection::Up, time)
        } else {
            if max_y >= regions.up_start && min_y <= regions.down_start {
                self.scroller.stop();
            }
            false
        };
        if started {
            host.post_scroll_tick();
        }
        Ok(())
    }

    /// Places the floating item for a pointer position, with renderer adjustment.
    fn drag_float(&mut self, geometry: &dyn SlotGeometry, pointer: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let proposed = Placement {
            origin: pointer - session.pointer_offset,
            opacity: self.float_alpha,
        };
        let adjusted = match self.renderer.as_mut() {
            Some(renderer) => renderer.adjust(&mut session.float, proposed, pointer, geometry),
            None => proposed,
        };
        session.opacity = adjusted.opacity.clamp(0.0, 1.0);
        session.origin = constrain_origin(session, geometry, adjusted.origin);
    }

    fn float_extent(&self, pointer_y: f64) -> Option<FloatExtent> {
        let bounds = self.session.as_ref()?.floating_bounds();
        Some(FloatExtent {
            pointer_y,
            top: bounds.y0,
            bottom: bounds.y1,
        })
    }

    /// Ends the active drag.
    ///
    /// With `remove` the remove listener fires with the source's data index.
    /// Otherwise the drop listener fires with `(source, drop slot)` if both
    /// are still draggable slots; if not, the drag is reported as cancelled.
    /// Always tears down the session, the auto-scroll loop and the floating
    /// item before returning.
    pub fn stop_drag<H: ListHost>(
        &mut self,
        host: &mut H,
        remove: bool,
    ) -> Result<DragOutcome, DragError> {
        let Some(session) = self.session.take() else {
            return Err(DragError::NotDragging);
        };
        self.state = EngineState::Stopped;
        self.scroller.stop();

        let headers = host.header_count();
        let range = draggable_range(&*host);
        let valid = |slot: usize| range.as_ref().is_some_and(|r| r.contains(&slot));

        let outcome = if remove {
            if valid(session.source) {
                let slot = session.source - headers;
                if let Some(listener) = self.listeners.remove.as_mut() {
                    listener(slot);
                }
                DragOutcome::Removed { slot }
            } else {
                DragOutcome::Cancelled
            }
        } else if valid(session.source) && valid(session.float_slot) {
            let (from, to) = (session.source - headers, session.float_slot - headers);
            if let Some(listener) = self.listeners.drop.as_mut() {
                listener(from, to);
            }
            reanchor_after_drop(host, session.source);
            DragOutcome::Dropped { from, to }
        } else {
            DragOutcome::Cancelled
        };

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.destroy_float(session.float);
        }
        self.state = EngineState::Idle;
        host.request_layout();

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "drag stopped", ?outcome);

        Ok(outcome)
    }

    /// Tells the engine the host's backing data changed.
    ///
    /// An active drag is stopped without removal; indices that no longer
    /// name draggable slots make it a cancellation with no listener fired.
    pub fn data_set_changed<H: ListHost>(&mut self, host: &mut H) -> Option<DragOutcome> {
        if self.session.is_none() {
            return None;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "data set changed during drag");
        self.stop_drag(host, false).ok()
    }

    /// Resolves the drop slot and gap placement against the host's current layout.
    ///
    /// Runs only while dragging. Nested layout requests are blocked for the
    /// duration of the pass. Fires the drag listener if the drop slot changed
    /// and applies any pending auto-scroll offset by re-anchoring the host.
    /// Returns `true` if the gap placement or drop slot changed. A pass whose
    /// geometry cannot be resolved is skipped.
    pub fn layout_pass<H: ListHost>(&mut self, host: &mut H) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let mut host = LayoutGuard::new(host);
        let model = session.model(&self.config);
        let old = session.shuffle;
        let target = match model.resolve(&old, &*host, session.float_mid(), self.scroller.pending()) {
            Ok(target) => target,
            Err(_fault) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "layout pass skipped", fault = %_fault);
                return false;
            }
        };
        session.shuffle = target.state;
        let mut updated = target.state != old;

        if target.float_slot != session.float_slot {
            let headers = host.header_count();
            let from = session.float_slot;
            session.float_slot = target.float_slot;
            updated = true;
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "drop slot changed", from, to = target.float_slot);
            // Header counts can grow before the host reports the data change.
            let adjusted = from
                .checked_sub(headers)
                .zip(target.float_slot.checked_sub(headers));
            if let (Some(listener), Some((from, to))) = (self.listeners.drag.as_mut(), adjusted) {
                listener(from, to);
            }
        }

        let pending = self.scroller.take_pending();
        if pending != 0.0 {
            apply_drag_scroll(&mut *host, &model, &old, &target.state, pending);
        }
        updated
    }

    /// Rendered layout of `slot`.
    ///
    /// Natural layout when no drag is active.
    pub fn row_layout<G: SlotGeometry + ?Sized>(&self, geometry: &G, slot: usize) -> RowLayout {
        match self.session.as_ref() {
            Some(session) => session
                .model(&self.config)
                .row_layout(&session.shuffle, geometry, slot),
            None => RowLayout::natural(natural_height(geometry, slot)),
        }
    }

    /// Runs one auto-scroll tick posted through [`ListHost::post_scroll_tick`].
    ///
    /// Returns `true` if the loop continues; a layout pass and the next tick
    /// have then been requested from the host.
    pub fn scroll_tick<H: ListHost>(&mut self, host: &mut H, now: u64) -> bool {
        if self.session.is_none() {
            self.scroller.stop();
            return false;
        }
        if !self.scroller.is_scrolling() {
            return false;
        }
        // Rows moved under a stationary pointer since the last tick.
        if let Some(pointer) = self.pointer {
            self.drag_float(&*host, pointer);
        }
        let pointer_y = self.pointer.map_or(0.0, |p| p.y);
        let Some(extent) = self.float_extent(pointer_y) else {
            return false;
        };
        if self.scroller.tick(&*host, now, extent) {
            host.request_layout();
            host.post_scroll_tick();
            true
        } else {
            false
        }
    }

    /// Where gap dividers should be drawn while dragging.
    ///
    /// One rect per distinct visible expanded slot other than the source, on
    /// the seam between the slot's content and its blank space.
    pub fn gap_dividers<G: SlotGeometry + ?Sized>(&self, geometry: &G) -> SmallVec<[Rect; 2]> {
        let mut out = SmallVec::new();
        let Some(session) = self.session.as_ref() else {
            return out;
        };
        let divider = geometry.divider_height();
        if divider <= 0.0 {
            return out;
        }
        let pad = geometry.padding();
        let left = pad.x0;
        let right = geometry.viewport().width - pad.x1;
        let state = session.shuffle;
        let mut slots: SmallVec<[usize; 2]> = SmallVec::new();
        if state.first_expanded != session.source {
            slots.push(state.first_expanded);
        }
        if state.is_sliding() && state.second_expanded != session.source {
            slots.push(state.second_expanded);
        }
        for slot in slots {
            let Some(bounds) = geometry.slot_bounds(slot) else {
                continue;
            };
            let child = natural_height(geometry, slot);
            let (top, bottom) = if slot > session.source {
                let top = bounds.y0 + child;
                (top, top + divider)
            } else {
                let bottom = bounds.y1 - child;
                (bottom - divider, bottom)
            };
            out.push(Rect::new(left, top, right, bottom));
        }
        out
    }
}

/// Constrains a proposed floating origin against drag flags and list bounds.
fn constrain_origin<F>(
    session: &DragSession<F>,
    geometry: &(impl SlotGeometry + ?Sized),
    proposed: Point,
) -> Point {
    let flags = session.flags;
    let pad = geometry.padding();

    let x = if (!flags.contains(DragFlags::RIGHT) && proposed.x > pad.x0)
        || (!flags.contains(DragFlags::LEFT) && proposed.x < pad.x0)
    {
        pad.x0
    } else {
        proposed.x
    };

    let (Some(first), Some(last)) = (geometry.first_visible(), geometry.last_visible()) else {
        return Point::new(x, proposed.y);
    };
    let headers = geometry.header_count();
    let source = session.source;
    let bottom = |slot: usize| geometry.slot_bounds(slot).map(|r| r.y1);
    let top = |slot: usize| geometry.slot_bounds(slot).map(|r| r.y0);

    // Never above the last header.
    let mut top_limit = pad.y0;
    if first < headers {
        if let Some(y) = bottom(headers - 1) {
            top_limit = y;
        }
    }
    if !flags.contains(DragFlags::UP) && first <= source {
        if let Some(y) = top(source) {
            top_limit = top_limit.max(y);
        }
    }

    // Never below the last draggable row.
    let mut bottom_limit = geometry.viewport().height - pad.y1;
    if let Some(range) = draggable_range(geometry) {
        let last_draggable = *range.end();
        if last >= last_draggable {
            if let Some(y) = bottom(last_draggable) {
                bottom_limit = y;
            }
        }
    }
    if !flags.contains(DragFlags::DOWN) && last >= source {
        if let Some(y) = bottom(source) {
            bottom_limit = bottom_limit.min(y);
        }
    }

    let height = session.float_size.height;
    let y = if proposed.y < top_limit {
        top_limit
    } else if proposed.y + height > bottom_limit {
        bottom_limit - height
    } else {
        proposed.y
    };
    Point::new(x, y)
}

/// Re-anchors the host after a drop whose source row lies above the viewport.
///
/// Once the host moves the item, every row between the source and the first
/// visible row shifts up by one index; anchoring the previous index at the
/// current top keeps the same content on screen.
fn reanchor_after_drop<H: ListHost + ?Sized>(host: &mut H, source: usize) {
    let Some(first) = host.first_visible() else {
        return;
    };
    if source >= first {
        return;
    }
    let pad_top = host.padding().y0;
    let top = host.slot_bounds(first).map_or(0.0, |r| r.y0);
    host.set_slot_top(first - 1, top - pad_top);
}

/// Applies an accumulated auto-scroll offset by re-anchoring one visible row.
///
/// The row at the leading edge is moved by `pending`, then compensated for
/// its own height change between `old` and `new` so the content next to the
/// gap does not jump.
fn apply_drag_scroll<H: ListHost + ?Sized>(
    host: &mut H,
    model: &ShuffleModel,
    old: &ShuffleState,
    new: &ShuffleState,
    pending: f64,
) {
    let pad_top = host.padding().y0;
    let list = list_height(&*host);
    let (pending, anchor) = if pending >= 0.0 {
        (pending.min(list), host.first_visible())
    } else {
        (pending.max(-list), host.last_visible())
    };
    let Some(anchor) = anchor else {
        return;
    };
    let Some(bounds) = host.slot_bounds(anchor) else {
        return;
    };

    let mut top = bounds.y0 + pending;
    if anchor == 0 && top > pad_top {
        top = pad_top;
    }

    let before = model.snapshot(old, &*host, anchor);
    let after = model.derived_snapshot(new, &*host, anchor);
    let float_height = model.float_height;

    if anchor <= old.first_expanded {
        if anchor > new.first_expanded {
            top += float_height - after.blank_height();
        }
    } else if anchor == old.second_expanded {
        if anchor <= new.first_expanded {
            top += before.blank_height() - float_height;
        } else if anchor == new.second_expanded {
            top += before.item_height - after.item_height;
        } else {
            top += before.blank_height();
        }
    } else if anchor <= new.first_expanded {
        top -= float_height;
    } else if anchor == new.second_expanded {
        top -= after.blank_height();
    }

    host.set_slot_top(anchor, top - pad_top);
}
