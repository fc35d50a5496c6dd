// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_reorder::DragFlags;
use understory_reorder::snapshot::SlideFade;

/// Default touch slop in pixels.
pub const DEFAULT_TOUCH_SLOP: f64 = 8.0;

/// Default long-press duration in milliseconds.
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

/// Default fling-removal threshold in pixels per second.
pub const DEFAULT_FLING_SPEED: f64 = 500.0;

/// When a press on a handle turns into a drag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum DragInitMode {
    /// As soon as the pointer goes down.
    #[default]
    OnPress,
    /// Once the pointer leaves the touch-slop circle along a useful axis.
    OnDragThreshold,
    /// After the pointer is held still for the long-press duration.
    OnLongPress,
}

/// Which gesture removes the dragged item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RemoveMode {
    /// Releasing while moving right faster than the fling speed.
    #[default]
    FlingRight,
    /// Releasing while moving left faster than the fling speed.
    FlingLeft,
    /// Releasing in the right third of the list.
    SlideRight,
    /// Releasing in the left third of the list.
    SlideLeft,
}

/// Configuration for [`GestureTranslator`](crate::GestureTranslator).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureConfig {
    init_mode: DragInitMode,
    sort_enabled: bool,
    remove_enabled: bool,
    remove_mode: RemoveMode,
    touch_slop: f64,
    long_press_ms: u64,
    fling_speed: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            init_mode: DragInitMode::OnPress,
            sort_enabled: true,
            remove_enabled: false,
            remove_mode: RemoveMode::FlingRight,
            touch_slop: DEFAULT_TOUCH_SLOP,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            fling_speed: DEFAULT_FLING_SPEED,
        }
    }
}

impl GestureConfig {
    /// Sets when drags start.
    #[must_use]
    pub fn with_init_mode(mut self, mode: DragInitMode) -> Self {
        self.init_mode = mode;
        self
    }

    /// Enables or disables vertical reordering.
    #[must_use]
    pub fn with_sort_enabled(mut self, enabled: bool) -> Self {
        self.sort_enabled = enabled;
        self
    }

    /// Enables removal with the given gesture.
    #[must_use]
    pub fn with_removal(mut self, mode: RemoveMode) -> Self {
        self.remove_enabled = true;
        self.remove_mode = mode;
        self
    }

    /// Disables removal.
    #[must_use]
    pub fn without_removal(mut self) -> Self {
        self.remove_enabled = false;
        self
    }

    /// Sets the touch slop in pixels; negative values are treated as zero.
    #[must_use]
    pub fn with_touch_slop(mut self, slop: f64) -> Self {
        self.touch_slop = if slop.is_nan() { 0.0 } else { slop.max(0.0) };
        self
    }

    /// Sets the long-press duration in milliseconds.
    #[must_use]
    pub fn with_long_press_ms(mut self, ms: u64) -> Self {
        self.long_press_ms = ms;
        self
    }

    /// Sets the fling-removal threshold in pixels per second.
    #[must_use]
    pub fn with_fling_speed(mut self, speed: f64) -> Self {
        self.fling_speed = if speed.is_nan() { 0.0 } else { speed.max(0.0) };
        self
    }

    /// When drags start.
    #[must_use]
    pub fn init_mode(&self) -> DragInitMode {
        self.init_mode
    }

    /// Whether vertical reordering is enabled.
    #[must_use]
    pub fn sort_enabled(&self) -> bool {
        self.sort_enabled
    }

    /// Whether removal is enabled.
    #[must_use]
    pub fn remove_enabled(&self) -> bool {
        self.remove_enabled
    }

    /// The removal gesture, if removal is enabled.
    #[must_use]
    pub fn remove_mode(&self) -> Option<RemoveMode> {
        self.remove_enabled.then_some(self.remove_mode)
    }

    /// Touch slop in pixels.
    #[must_use]
    pub fn touch_slop(&self) -> f64 {
        self.touch_slop
    }

    /// Long-press duration in milliseconds.
    #[must_use]
    pub fn long_press_ms(&self) -> u64 {
        self.long_press_ms
    }

    /// Fling-removal threshold in pixels per second.
    #[must_use]
    pub fn fling_speed(&self) -> f64 {
        self.fling_speed
    }

    /// Motion permitted to a drag started under this configuration.
    ///
    /// Sorting frees both vertical directions. Fling removal frees the fling
    /// direction; slide removal adds nothing since only the pointer x matters.
    #[must_use]
    pub fn drag_flags(&self) -> DragFlags {
        let mut flags = DragFlags::empty();
        if self.sort_enabled {
            flags |= DragFlags::VERTICAL;
        }
        match self.remove_mode() {
            Some(RemoveMode::FlingRight) => flags |= DragFlags::RIGHT,
            Some(RemoveMode::FlingLeft) => flags |= DragFlags::LEFT,
            _ => {}
        }
        flags
    }

    /// Fade a [`SnapshotRenderer`](understory_reorder::snapshot::SnapshotRenderer)
    /// should apply under this configuration.
    #[must_use]
    pub fn slide_fade(&self) -> SlideFade {
        match self.remove_mode() {
            Some(RemoveMode::SlideRight) => SlideFade::TowardRight,
            Some(RemoveMode::SlideLeft) => SlideFade::TowardLeft,
            _ => SlideFade::Off,
        }
    }
}
