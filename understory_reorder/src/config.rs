// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static engine configuration.
//!
//! Both structs are plain values with clamping builder methods; they are read
//! by the engine when a drag starts and on every pass, never mutated by it.

/// Largest fraction of the list height a single scroll-trigger region may cover.
pub const MAX_SCROLL_REGION_FRACTION: f64 = 0.5;

/// Configuration of the auto-scroll regions and default speed profile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollConfig {
    up_fraction: f64,
    down_fraction: f64,
    max_speed: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            up_fraction: 1.0 / 3.0,
            down_fraction: 1.0 / 3.0,
            max_speed: 0.3,
        }
    }
}

impl ScrollConfig {
    /// Sets the height of the top scroll-trigger region as a fraction of the list height.
    ///
    /// Clamped to `[0, 0.5]`.
    #[must_use]
    pub fn with_up_fraction(mut self, fraction: f64) -> Self {
        self.up_fraction = clamp_region(fraction);
        self
    }

    /// Sets the height of the bottom scroll-trigger region as a fraction of the list height.
    ///
    /// Clamped to `[0, 0.5]`.
    #[must_use]
    pub fn with_down_fraction(mut self, fraction: f64) -> Self {
        self.down_fraction = clamp_region(fraction);
        self
    }

    /// Sets both trigger regions at once.
    #[must_use]
    pub fn with_region_fraction(self, fraction: f64) -> Self {
        self.with_up_fraction(fraction).with_down_fraction(fraction)
    }

    /// Sets the maximum speed of the default linear profile, in pixels per millisecond.
    ///
    /// Negative values are treated as zero.
    #[must_use]
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed.max(0.0);
        self
    }

    /// Fraction of the list height covered by the top trigger region.
    #[must_use]
    pub fn up_fraction(&self) -> f64 {
        self.up_fraction
    }

    /// Fraction of the list height covered by the bottom trigger region.
    #[must_use]
    pub fn down_fraction(&self) -> f64 {
        self.down_fraction
    }

    /// Maximum speed of the default linear profile, in pixels per millisecond.
    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }
}

fn clamp_region(fraction: f64) -> f64 {
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, MAX_SCROLL_REGION_FRACTION)
}

/// Configuration of the drag engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReorderConfig {
    slide_region_fraction: f64,
    collapsed_height: f64,
    float_alpha: f64,
    scroll: ScrollConfig,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            slide_region_fraction: 0.75,
            collapsed_height: 1.0,
            float_alpha: 1.0,
            scroll: ScrollConfig::default(),
        }
    }
}

impl ReorderConfig {
    /// Sets the share of the space between two shuffle edges that animates
    /// the insertion gap between neighbouring slots.
    ///
    /// Clamped to `[0, 1]`. Zero disables partial slides: the gap snaps from
    /// slot to slot.
    #[must_use]
    pub fn with_slide_region_fraction(mut self, fraction: f64) -> Self {
        self.slide_region_fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self
    }

    /// Sets the rendered height of the collapsed source row.
    ///
    /// Values below one pixel are raised to one so the row never disappears
    /// from the host's layout.
    #[must_use]
    pub fn with_collapsed_height(mut self, height: f64) -> Self {
        self.collapsed_height = height.max(1.0);
        self
    }

    /// Sets the base opacity of the floating item.
    ///
    /// Clamped to `[0, 1]`.
    #[must_use]
    pub fn with_float_alpha(mut self, alpha: f64) -> Self {
        self.float_alpha = if alpha.is_nan() {
            1.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        self
    }

    /// Replaces the auto-scroll configuration.
    #[must_use]
    pub fn with_scroll(mut self, scroll: ScrollConfig) -> Self {
        self.scroll = scroll;
        self
    }

    /// Share of the edge-to-edge span used for partial slides.
    #[must_use]
    pub fn slide_region_fraction(&self) -> f64 {
        self.slide_region_fraction
    }

    /// Rendered height of the collapsed source row.
    #[must_use]
    pub fn collapsed_height(&self) -> f64 {
        self.collapsed_height
    }

    /// Base opacity of the floating item.
    #[must_use]
    pub fn float_alpha(&self) -> f64 {
        self.float_alpha
    }

    /// Auto-scroll configuration.
    #[must_use]
    pub fn scroll(&self) -> &ScrollConfig {
        &self.scroll
    }
}
