// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Auto-scrolling while the floating item sits near a viewport edge.
//!
//! The scroller is a cooperative tick loop: the engine asks the host to post a
//! deferred tick, each tick accumulates a scroll offset and re-arms itself, and
//! clearing the [`ScrollState`] cancels the loop at the top of the next tick.
//! Hosts keep at most one tick pending (see
//! [`ListHost::post_scroll_tick`](crate::ListHost::post_scroll_tick)). Each tick
//! integrates speed over the time since the previous one, so a stray tick in
//! the same frame adds no offset.
//! Offsets are in pixels with positive values moving content down (revealing
//! earlier rows).

use alloc::boxed::Box;
use core::fmt;

use crate::config::ScrollConfig;
use crate::geometry::{SlotGeometry, list_height};

/// Maps how deep the floating item is into a trigger region to a scroll speed.
pub trait SpeedProfile {
    /// Speed in pixels per millisecond.
    ///
    /// `depth` is in `[0, 1]`, zero at the inner edge of the trigger region and
    /// one at the viewport edge. `elapsed` is the time in milliseconds since
    /// scrolling started.
    fn speed(&self, depth: f64, elapsed: u64) -> f64;
}

/// Speed proportional to depth.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearProfile {
    /// Speed at full depth, pixels per millisecond.
    pub max_speed: f64,
}

impl Default for LinearProfile {
    fn default() -> Self {
        Self { max_speed: 0.3 }
    }
}

impl SpeedProfile for LinearProfile {
    fn speed(&self, depth: f64, _elapsed: u64) -> f64 {
        self.max_speed * depth
    }
}

impl<F: Fn(f64, u64) -> f64> SpeedProfile for F {
    fn speed(&self, depth: f64, elapsed: u64) -> f64 {
        self(depth, elapsed)
    }
}

/// Direction the list content is being scrolled toward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Toward the start of the list.
    Up,
    /// Toward the end of the list.
    Down,
}

/// Live auto-scroll state. Exists only while scrolling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollState {
    /// Direction of travel.
    pub direction: ScrollDirection,
    /// When scrolling started, in host milliseconds.
    pub start_time: u64,
    /// When the last tick ran.
    pub last_tick: u64,
    /// Offset accumulated since the last layout pass.
    pub pending_offset: f64,
}

/// Trigger regions derived from the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollRegions {
    /// Pointer or float top above this y starts scrolling up.
    pub up_start: f64,
    /// Pointer or float bottom below this y starts scrolling down.
    pub down_start: f64,
    /// Height of the upper region.
    pub up_height: f64,
    /// Height of the lower region.
    pub down_height: f64,
}

impl ScrollRegions {
    /// Computes regions for the host's current viewport.
    #[must_use]
    pub fn new(config: &ScrollConfig, geometry: &(impl SlotGeometry + ?Sized)) -> Self {
        let pad_top = geometry.padding().y0;
        let list = list_height(geometry);
        let up_start = pad_top + config.up_fraction() * list;
        let down_start = pad_top + (1.0 - config.down_fraction()) * list;
        Self {
            up_start,
            down_start,
            up_height: up_start - pad_top,
            down_height: pad_top + list - down_start,
        }
    }

    /// Depth of `y` into the upper region, clamped to `[0, 1]`.
    #[must_use]
    pub fn up_depth(&self, y: f64) -> f64 {
        depth(self.up_start - y, self.up_height)
    }

    /// Depth of `y` into the lower region, clamped to `[0, 1]`.
    #[must_use]
    pub fn down_depth(&self, y: f64) -> f64 {
        depth(y - self.down_start, self.down_height)
    }
}

fn depth(distance: f64, height: f64) -> f64 {
    if height <= 0.0 {
        return if distance >= 0.0 { 1.0 } else { 0.0 };
    }
    (distance / height).clamp(0.0, 1.0)
}

/// Vertical extent of the floating item and pointer, sampled for one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloatExtent {
    /// Pointer y.
    pub pointer_y: f64,
    /// Top of the floating item.
    pub top: f64,
    /// Bottom of the floating item.
    pub bottom: f64,
}

impl FloatExtent {
    /// The lower of pointer and float bottom; what the lower region reacts to.
    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.pointer_y.min(self.bottom)
    }

    /// The higher of pointer and float top; what the upper region reacts to.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.pointer_y.max(self.top)
    }
}

/// The self-rescheduling scroll loop.
pub struct AutoScroller {
    config: ScrollConfig,
    profile: Box<dyn SpeedProfile>,
    state: Option<ScrollState>,
}

impl fmt::Debug for AutoScroller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoScroller")
            .field("config", &self.config)
            .field("profile", &"<dyn SpeedProfile>")
            .field("state", &self.state)
            .finish()
    }
}

impl AutoScroller {
    /// Creates an idle scroller using a [`LinearProfile`] at the configured max speed.
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            profile: Box::new(LinearProfile {
                max_speed: config.max_speed(),
            }),
            config,
            state: None,
        }
    }

    /// Replaces the speed profile.
    pub fn set_profile(&mut self, profile: impl SpeedProfile + 'static) {
        self.profile = Box::new(profile);
    }

    /// Scroll configuration.
    #[must_use]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Current state, if scrolling.
    #[must_use]
    pub fn state(&self) -> Option<&ScrollState> {
        self.state.as_ref()
    }

    /// Returns `true` while a scroll loop is live.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.state.is_some()
    }

    /// Direction of the live loop.
    #[must_use]
    pub fn direction(&self) -> Option<ScrollDirection> {
        self.state.map(|s| s.direction)
    }

    /// Starts scrolling in `direction`.
    ///
    /// A loop already running the other way is stopped and restarted; one
    /// running the same way is left alone. Returns `true` when a new loop was
    /// started and the caller must post its first tick.
    pub fn start(&mut self, direction: ScrollDirection, now: u64) -> bool {
        if self.direction() == Some(direction) {
            return false;
        }
        self.stop();
        self.state = Some(ScrollState {
            direction,
            start_time: now,
            last_tick: now,
            pending_offset: 0.0,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "auto-scroll started", ?direction, now);
        true
    }

    /// Stops and destroys the scroll loop.
    pub fn stop(&mut self) {
        if let Some(_state) = self.state.take() {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "auto-scroll stopped", direction = ?_state.direction);
        }
    }

    /// Takes the offset accumulated since the last call.
    pub fn take_pending(&mut self) -> f64 {
        self.state
            .as_mut()
            .map(|s| core::mem::take(&mut s.pending_offset))
            .unwrap_or(0.0)
    }

    /// Offset accumulated since the last [`take_pending`](Self::take_pending).
    #[must_use]
    pub fn pending(&self) -> f64 {
        self.state.map(|s| s.pending_offset).unwrap_or(0.0)
    }

    /// Runs one tick.
    ///
    /// Returns `true` if the loop continues, in which case the caller must
    /// request a layout pass and post the next tick. Returns `false` and
    /// destroys the state when idle or at the extreme edge in the direction
    /// of travel.
    pub fn tick(
        &mut self,
        geometry: &(impl SlotGeometry + ?Sized),
        now: u64,
        extent: FloatExtent,
    ) -> bool {
        let Some(mut state) = self.state else {
            return false;
        };
        if at_extreme(geometry, state.direction) {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "auto-scroll reached list edge", direction = ?state.direction);
            self.state = None;
            return false;
        }

        let regions = ScrollRegions::new(&self.config, geometry);
        let elapsed = now.saturating_sub(state.start_time);
        let speed = match state.direction {
            ScrollDirection::Up => self.profile.speed(regions.up_depth(extent.max_y()), elapsed),
            ScrollDirection::Down => {
                -self
                    .profile
                    .speed(regions.down_depth(extent.min_y()), elapsed)
            }
        };
        let dt = now.saturating_sub(state.last_tick);
        let delta = speed * dt as f64;
        state.pending_offset += delta;
        state.last_tick = now;
        self.state = Some(state);
        true
    }
}

/// Whether the list cannot scroll any further in `direction`.
///
/// An empty layout counts as an extreme edge.
fn at_extreme(geometry: &(impl SlotGeometry + ?Sized), direction: ScrollDirection) -> bool {
    let pad = geometry.padding();
    match direction {
        ScrollDirection::Up => {
            let Some(first) = geometry.first_visible() else {
                return true;
            };
            let Some(bounds) = geometry.slot_bounds(first) else {
                return true;
            };
            first == 0 && bounds.y0 >= pad.y0
        }
        ScrollDirection::Down => {
            let Some(last) = geometry.last_visible() else {
                return true;
            };
            let Some(bounds) = geometry.slot_bounds(last) else {
                return true;
            };
            let content_bottom = geometry.viewport().height - pad.y1;
            last + 1 == geometry.slot_count() && bounds.y1 <= content_bottom
        }
    }
}
