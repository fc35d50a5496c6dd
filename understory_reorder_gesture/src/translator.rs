// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use understory_reorder::{
    DragEngine, DragError, DragOutcome, FloatingItemRenderer, ListHost, PointerEvent, PointerPhase,
};

use crate::config::{DragInitMode, GestureConfig, RemoveMode};
use crate::handle::{HandleHit, HandleLocator, hit_handle};
use crate::press::PressState;
use crate::velocity::VelocityTracker;

/// Turns raw pointer events into drag starts and removals.
///
/// Every event goes through [`handle`](Self::handle), which feeds the engine,
/// may start a drag according to the [`DragInitMode`], classifies removal on
/// release and finally lets the engine continue or stop the drag. Long presses
/// additionally need [`poll_long_press`](Self::poll_long_press) from the host's
/// timer, since the pointer may not move while it is held.
#[derive(Clone, Debug, Default)]
pub struct GestureTranslator {
    config: GestureConfig,
    press: PressState,
    velocity: VelocityTracker,
    candidate: Option<HandleHit>,
    long_press_armed: bool,
}

impl GestureTranslator {
    /// Creates a translator.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replaces the configuration; applies from the next press.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// The handle hit by the current press, if any.
    #[must_use]
    pub fn candidate(&self) -> Option<HandleHit> {
        self.candidate
    }

    /// Whether a long press is pending for the current press.
    #[must_use]
    pub fn long_press_pending(&self) -> bool {
        self.long_press_armed
    }

    /// Processes one pointer event.
    ///
    /// Returns the outcome if the event ended a drag, either by removal or by
    /// the engine's own drop on release.
    pub fn handle<R, H, L>(
        &mut self,
        engine: &mut DragEngine<R>,
        host: &mut H,
        locator: &mut L,
        event: &PointerEvent,
    ) -> Option<DragOutcome>
    where
        R: FloatingItemRenderer,
        H: ListHost,
        L: HandleLocator + ?Sized,
    {
        engine.track_pointer(event);
        let removed = match event.phase {
            PointerPhase::Down => {
                self.on_down(engine, host, &*locator, event);
                None
            }
            PointerPhase::Move => {
                self.on_move(engine, host, locator, event);
                None
            }
            PointerPhase::Up => {
                self.velocity.add(event.time, event.position);
                let removed = self.classify_release(engine, host, event.position);
                self.reset();
                removed
            }
            PointerPhase::Cancel => {
                self.reset();
                None
            }
        };
        let driven = engine.drive_pointer(host, event);
        removed.or(driven)
    }

    /// Starts a drag if a long press on a handle has been held long enough.
    ///
    /// Returns `true` if a drag was started.
    pub fn poll_long_press<R, H, L>(
        &mut self,
        engine: &mut DragEngine<R>,
        host: &mut H,
        locator: &mut L,
        now: u64,
    ) -> bool
    where
        R: FloatingItemRenderer,
        H: ListHost,
        L: HandleLocator + ?Sized,
    {
        if !self.long_press_armed || self.press.held_for(now) < self.config.long_press_ms() {
            return false;
        }
        self.long_press_armed = false;
        let (Some(hit), Some(pressed_at)) = (self.candidate, self.press.start_pos) else {
            return false;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "long press", slot = hit.slot, now);
        locator.long_press_feedback();
        self.start(engine, host, hit, pressed_at).is_ok()
    }

    fn on_down<R, H, L>(
        &mut self,
        engine: &mut DragEngine<R>,
        host: &mut H,
        locator: &L,
        event: &PointerEvent,
    ) where
        R: FloatingItemRenderer,
        H: ListHost,
        L: HandleLocator + ?Sized,
    {
        self.press.start(event.position, event.time);
        self.velocity.clear();
        self.velocity.add(event.time, event.position);
        self.candidate = hit_handle(&*host, locator, event.position);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "press",
            slot = ?self.candidate.map(|h| h.slot),
            mode = ?self.config.init_mode()
        );

        let Some(hit) = self.candidate else {
            self.long_press_armed = false;
            return;
        };
        match self.config.init_mode() {
            DragInitMode::OnPress => {
                let _ = self.start(engine, host, hit, event.position);
            }
            DragInitMode::OnLongPress => self.long_press_armed = true,
            DragInitMode::OnDragThreshold => {}
        }
    }

    fn on_move<R, H, L>(
        &mut self,
        engine: &mut DragEngine<R>,
        host: &mut H,
        locator: &mut L,
        event: &PointerEvent,
    ) where
        R: FloatingItemRenderer,
        H: ListHost,
        L: HandleLocator + ?Sized,
    {
        if !self.press.is_pressed() {
            return;
        }
        self.velocity.add(event.time, event.position);
        self.press.update(event.position);

        // A hold that already lasted long enough fires before the move can cancel it.
        self.poll_long_press(engine, host, locator, event.time);

        let slop = self.config.touch_slop();
        if !self.press.beyond_slop(slop) {
            return;
        }
        self.long_press_armed = false;

        if self.config.init_mode() != DragInitMode::OnDragThreshold || engine.is_dragging() {
            return;
        }
        let Some(hit) = self.candidate else {
            return;
        };
        let offset = self.press.total_offset(event.position).unwrap_or(Vec2::ZERO);
        let sort = self.config.sort_enabled();
        let remove = self.config.remove_enabled();
        let start = match (sort, remove) {
            (true, true) => true,
            (false, true) => offset.x.abs() > slop,
            (true, false) => offset.y.abs() > slop,
            (false, false) => false,
        };
        if start {
            let _ = self.start(engine, host, hit, event.position);
        }
    }

    /// Decides whether a release removes the dragged item, and removes it.
    fn classify_release<R, H>(
        &mut self,
        engine: &mut DragEngine<R>,
        host: &mut H,
        release: Point,
    ) -> Option<DragOutcome>
    where
        R: FloatingItemRenderer,
        H: ListHost,
    {
        if !engine.is_dragging() {
            return None;
        }
        let mode = self.config.remove_mode()?;
        let width = host.viewport().width;
        let third = width / 3.0;
        let fling = self.config.fling_speed();
        let remove = match mode {
            RemoveMode::SlideRight => release.x > width - third,
            RemoveMode::SlideLeft => release.x < third,
            RemoveMode::FlingRight => self.velocity.velocity().is_some_and(|v| v.x > fling),
            RemoveMode::FlingLeft => self.velocity.velocity().is_some_and(|v| v.x < -fling),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "release classified",
            ?mode,
            remove,
            velocity = ?self.velocity.velocity()
        );
        if !remove {
            return None;
        }
        engine.stop_drag(host, true).ok()
    }

    /// Starts dragging `hit`, keeping the pointer at the same spot inside the row.
    fn start<R, H>(
        &mut self,
        engine: &mut DragEngine<R>,
        host: &mut H,
        hit: HandleHit,
        pointer: Point,
    ) -> Result<(), DragError>
    where
        R: FloatingItemRenderer,
        H: ListHost,
    {
        let offset = pointer - hit.row.origin();
        let result = engine.start_drag(host, hit.slot, self.config.drag_flags(), offset);
        if result.is_ok() {
            self.long_press_armed = false;
        }
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::debug!(message = "drag not started", slot = hit.slot, %err);
        }
        result
    }

    fn reset(&mut self) {
        self.press.end();
        self.velocity.clear();
        self.candidate = None;
        self.long_press_armed = false;
    }
}
