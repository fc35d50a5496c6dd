// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};
use understory_reorder::{SlotGeometry, draggable_range};

/// Locates the drag handle inside a row.
pub trait HandleLocator {
    /// Bounds of `slot`'s handle, given the row's on-screen bounds.
    ///
    /// `None` if the row has no handle.
    fn handle_bounds(&self, slot: usize, row: Rect) -> Option<Rect>;

    /// Called when a long press starts a drag, for haptic or visual feedback.
    fn long_press_feedback(&mut self) {}
}

/// The whole row is the handle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WholeRow;

impl HandleLocator for WholeRow {
    fn handle_bounds(&self, _slot: usize, row: Rect) -> Option<Rect> {
        Some(row)
    }
}

impl<F: Fn(usize, Rect) -> Option<Rect>> HandleLocator for F {
    fn handle_bounds(&self, slot: usize, row: Rect) -> Option<Rect> {
        self(slot, row)
    }
}

/// A row whose handle was hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HandleHit {
    /// Slot of the row.
    pub slot: usize,
    /// On-screen bounds of the row at the time of the hit.
    pub row: Rect,
}

/// Finds the visible, draggable row whose handle strictly contains `point`.
pub fn hit_handle<G, L>(geometry: &G, locator: &L, point: Point) -> Option<HandleHit>
where
    G: SlotGeometry + ?Sized,
    L: HandleLocator + ?Sized,
{
    let range = draggable_range(geometry)?;
    let first = geometry.first_visible()?.max(*range.start());
    let last = geometry.last_visible()?.min(*range.end());
    (first..=last).find_map(|slot| {
        let row = geometry.slot_bounds(slot)?;
        if point.y < row.y0 || point.y >= row.y1 {
            return None;
        }
        let handle = locator.handle_bounds(slot, row)?;
        let inside = point.x > handle.x0
            && point.x < handle.x1
            && point.y > handle.y0
            && point.y < handle.y1;
        inside.then_some(HandleHit { slot, row })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Insets, Size};

    struct Rows {
        headers: usize,
    }

    impl SlotGeometry for Rows {
        fn slot_count(&self) -> usize {
            6
        }
        fn header_count(&self) -> usize {
            self.headers
        }
        fn footer_count(&self) -> usize {
            1
        }
        fn first_visible(&self) -> Option<usize> {
            Some(0)
        }
        fn last_visible(&self) -> Option<usize> {
            Some(5)
        }
        fn slot_bounds(&self, slot: usize) -> Option<Rect> {
            let y = slot as f64 * 50.0;
            (slot < 6).then(|| Rect::new(0.0, y, 300.0, y + 50.0))
        }
        fn natural_height(&self, _slot: usize) -> Option<f64> {
            Some(50.0)
        }
        fn viewport(&self) -> Size {
            Size::new(300.0, 300.0)
        }
        fn padding(&self) -> Insets {
            Insets::ZERO
        }
    }

    fn grip(_slot: usize, row: Rect) -> Option<Rect> {
        Some(Rect::new(row.x1 - 40.0, row.y0, row.x1, row.y1))
    }

    #[test]
    fn whole_row_hits_any_interior_point() {
        let rows = Rows { headers: 0 };
        let hit = hit_handle(&rows, &WholeRow, Point::new(10.0, 120.0)).unwrap();
        assert_eq!(hit.slot, 2);
        assert_eq!(hit.row, Rect::new(0.0, 100.0, 300.0, 150.0));
    }

    #[test]
    fn grip_must_contain_the_point() {
        let rows = Rows { headers: 0 };
        assert_eq!(hit_handle(&rows, &grip, Point::new(10.0, 120.0)), None);
        assert_eq!(
            hit_handle(&rows, &grip, Point::new(280.0, 120.0)).map(|h| h.slot),
            Some(2)
        );
        // Handle edges do not count.
        assert_eq!(hit_handle(&rows, &grip, Point::new(260.0, 120.0)), None);
    }

    #[test]
    fn headers_and_footers_never_hit() {
        let rows = Rows { headers: 2 };
        assert_eq!(hit_handle(&rows, &WholeRow, Point::new(10.0, 60.0)), None);
        assert_eq!(hit_handle(&rows, &WholeRow, Point::new(10.0, 260.0)), None);
        assert_eq!(
            hit_handle(&rows, &WholeRow, Point::new(10.0, 110.0)).map(|h| h.slot),
            Some(2)
        );
    }
}
