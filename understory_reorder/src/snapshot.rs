// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default floating item renderer: a static snapshot of the dragged row.
//!
//! Capturing pixels is the host's business. [`SnapshotRenderer`] asks a
//! [`RowSnapshotter`] for an opaque image of the row, sizes the floating item
//! from the row's on-screen bounds and, when slide removal is configured,
//! fades it out as the pointer moves toward the removal side.

use kurbo::{Point, Rect, Size};
use peniko::Color;

use crate::geometry::SlotGeometry;
use crate::renderer::{FloatingItemRenderer, Placement};

/// Captures the current appearance of a row.
pub trait RowSnapshotter {
    /// Captured image type.
    type Image;

    /// Captures the row at `slot`, currently drawn at `bounds`.
    fn capture(&mut self, slot: usize, bounds: Rect) -> Option<Self::Image>;

    /// Releases a captured image.
    fn release(&mut self, image: Self::Image) {
        let _ = image;
    }
}

impl<I, F: FnMut(usize, Rect) -> Option<I>> RowSnapshotter for F {
    type Image = I;

    fn capture(&mut self, slot: usize, bounds: Rect) -> Option<I> {
        self(slot, bounds)
    }
}

/// Which way a slide-removal fade runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SlideFade {
    /// Opacity is not touched.
    #[default]
    Off,
    /// Fully opaque in the left third, transparent in the right third.
    TowardRight,
    /// Transparent in the left third, fully opaque in the right third.
    TowardLeft,
}

impl SlideFade {
    /// Opacity multiplier for a pointer at `x` over a list `width` wide.
    #[must_use]
    pub fn alpha(self, x: f64, width: f64) -> f64 {
        let third = width / 3.0;
        if third <= 0.0 {
            return 1.0;
        }
        match self {
            Self::Off => 1.0,
            Self::TowardRight => ((width - third - x) / third).clamp(0.0, 1.0),
            Self::TowardLeft => ((x - third) / third).clamp(0.0, 1.0),
        }
    }
}

/// A captured row floating under the pointer.
#[derive(Clone, Debug)]
pub struct FloatSnapshot<I> {
    /// The captured image.
    pub image: I,
    /// Size of the captured row.
    pub size: Size,
    /// Where the row was drawn when captured.
    pub source_bounds: Rect,
    /// Background painted behind the image, if any.
    pub background: Option<Color>,
    /// Opacity last applied by the renderer.
    pub opacity: f64,
}

impl<I> FloatSnapshot<I> {
    /// Background color with the current opacity applied.
    #[must_use]
    pub fn tinted_background(&self) -> Option<Color> {
        #[expect(clippy::cast_possible_truncation, reason = "opacity is in [0, 1]")]
        let alpha = self.opacity as f32;
        self.background.map(|c| c.multiply_alpha(alpha))
    }
}

/// Renderer that floats a static capture of the dragged row.
#[derive(Clone, Debug)]
pub struct SnapshotRenderer<S> {
    snapshotter: S,
    background: Option<Color>,
    fade: SlideFade,
}

impl<S: RowSnapshotter> SnapshotRenderer<S> {
    /// Creates a renderer around a snapshotter, without background or fade.
    #[must_use]
    pub fn new(snapshotter: S) -> Self {
        Self {
            snapshotter,
            background: None,
            fade: SlideFade::Off,
        }
    }

    /// Paints `color` behind captured rows.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Fades the floating item while it slides toward a removal side.
    #[must_use]
    pub fn with_fade(mut self, fade: SlideFade) -> Self {
        self.fade = fade;
        self
    }

    /// Changes the fade direction.
    pub fn set_fade(&mut self, fade: SlideFade) {
        self.fade = fade;
    }

    /// Current fade direction.
    #[must_use]
    pub fn fade(&self) -> SlideFade {
        self.fade
    }

    /// The wrapped snapshotter.
    #[must_use]
    pub fn snapshotter(&self) -> &S {
        &self.snapshotter
    }
}

impl<S: RowSnapshotter> FloatingItemRenderer for SnapshotRenderer<S> {
    type Float = FloatSnapshot<S::Image>;

    fn create_float(&mut self, slot: usize, geometry: &dyn SlotGeometry) -> Option<Self::Float> {
        let bounds = geometry.slot_bounds(slot)?;
        let image = self.snapshotter.capture(slot, bounds)?;
        Some(FloatSnapshot {
            image,
            size: bounds.size(),
            source_bounds: bounds,
            background: self.background,
            opacity: 1.0,
        })
    }

    fn float_size(&self, float: &Self::Float) -> Size {
        float.size
    }

    fn adjust(
        &mut self,
        float: &mut Self::Float,
        proposed: Placement,
        pointer: Point,
        geometry: &dyn SlotGeometry,
    ) -> Placement {
        let alpha = self.fade.alpha(pointer.x, geometry.viewport().width);
        let opacity = proposed.opacity * alpha;
        float.opacity = opacity;
        Placement {
            origin: proposed.origin,
            opacity,
        }
    }

    fn destroy_float(&mut self, float: Self::Float) {
        self.snapshotter.release(float.image);
    }
}
