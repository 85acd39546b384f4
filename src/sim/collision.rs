//! Collision detection
//!
//! Everything in the playfield is an axis-aligned rectangle, so a hit is a
//! strict interval overlap on both axes.

use super::rect::Rect;

/// Check whether two rectangles overlap
///
/// Strict inequalities: rectangles that only share an edge do not overlap,
/// and a zero-area rectangle never overlaps anything.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x() < b.x() + b.width()
        && a.x() + a.width() > b.x()
        && a.y() < b.y() + b.height()
        && a.y() + a.height() > b.y()
}

/// Index of the last item whose footprint overlaps `rect`
///
/// Scans back to front so that removing the returned index never shifts an
/// item that has not been visited yet.
pub fn first_overlap<T>(rect: &Rect, items: &[T], footprint: impl Fn(&T) -> Rect) -> Option<usize> {
    items.iter().rposition(|item| overlaps(rect, &footprint(item)))
}
