// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Release velocity estimation.
//!
//! [`VelocityTracker`] keeps the pointer samples of the last
//! [`VELOCITY_WINDOW_MS`] milliseconds and fits a least-squares line through
//! them per axis. Velocities are in pixels per second.
//!
//! ```
//! use kurbo::Point;
//! use understory_reorder_gesture::velocity::VelocityTracker;
//!
//! let mut tracker = VelocityTracker::default();
//! for i in 0..=5 {
//!     tracker.add(i * 20, Point::new(12.0 * i as f64, 100.0));
//! }
//! let v = tracker.velocity().unwrap();
//! assert!((v.x - 600.0).abs() < 1e-9);
//! assert!(v.y.abs() < 1e-9);
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Samples older than this, relative to the newest, are ignored.
pub const VELOCITY_WINDOW_MS: u64 = 100;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Sample {
    time: u64,
    position: Point,
}

/// Least-squares pointer velocity over a short trailing window.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: SmallVec<[Sample; 16]>,
}

impl VelocityTracker {
    /// Records a sample, dropping those that fell out of the window.
    ///
    /// A sample older than the newest one restarts tracking.
    pub fn add(&mut self, time: u64, position: Point) {
        if self.samples.last().is_some_and(|s| s.time > time) {
            self.samples.clear();
        }
        self.samples.push(Sample { time, position });
        let cutoff = time.saturating_sub(VELOCITY_WINDOW_MS);
        let stale = self.samples.iter().take_while(|s| s.time < cutoff).count();
        if stale > 0 {
            self.samples.drain(..stale);
        }
    }

    /// Forgets all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of samples in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no samples are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Estimated velocity in pixels per second.
    ///
    /// `None` with fewer than two samples or when all samples share a timestamp.
    #[must_use]
    pub fn velocity(&self) -> Option<Vec2> {
        if self.samples.len() < 2 {
            return None;
        }
        let origin = self.samples[0].time;
        let n = self.samples.len() as f64;
        let (mut st, mut sx, mut sy) = (0.0, 0.0, 0.0);
        for s in &self.samples {
            st += (s.time - origin) as f64;
            sx += s.position.x;
            sy += s.position.y;
        }
        let (mt, mx, my) = (st / n, sx / n, sy / n);
        let (mut stt, mut stx, mut sty) = (0.0, 0.0, 0.0);
        for s in &self.samples {
            let dt = (s.time - origin) as f64 - mt;
            stt += dt * dt;
            stx += dt * (s.position.x - mx);
            sty += dt * (s.position.y - my);
        }
        if stt <= 0.0 {
            return None;
        }
        // Slopes are px/ms.
        Some(Vec2::new(stx / stt, sty / stt) * 1000.0)
    }
}
