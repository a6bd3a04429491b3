// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and rectangle lists used for clipping.

use smallvec::SmallVec;

use crate::kurbo::Rect;

/// An axis-aligned rectangle with integer coordinates.
///
/// Rectangles with a non-positive width or height are empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl IntRect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its edges.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    /// The smallest integer rectangle containing `rect`.
    ///
    /// A zero-area `rect` encloses no pixels and gives an empty rectangle.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float to int casts saturate, which is the clamping we want"
    )]
    pub fn enclosing(rect: Rect) -> Self {
        let rect = rect.abs();
        if !(rect.width() > 0.0 && rect.height() > 0.0) {
            return Self::default();
        }
        Self::from_edges(
            rect.x0.floor() as i32,
            rect.y0.floor() as i32,
            rect.x1.ceil() as i32,
            rect.y1.ceil() as i32,
        )
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// The overlapping part of both rectangles, empty if they don't overlap.
    #[must_use]
    pub fn intersection(&self, other: Self) -> Self {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Self::from_edges(left, top, right, bottom)
        } else {
            Self::default()
        }
    }

    /// Whether both rectangles share at least one pixel.
    pub fn intersects(&self, other: Self) -> bool {
        !self.intersection(other).is_empty()
    }

    /// The smallest rectangle containing both. Empty rectangles are ignored.
    #[must_use]
    pub fn union(&self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Returns this rectangle moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Returns this rectangle grown by `amount` on every side.
    #[must_use]
    pub fn expanded(&self, amount: i32) -> Self {
        Self::from_edges(
            self.x.saturating_sub(amount),
            self.y.saturating_sub(amount),
            self.right().saturating_add(amount),
            self.bottom().saturating_add(amount),
        )
    }

    /// Converts to a floating point rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

/// A set of non-empty integer rectangles, describing a region.
///
/// Rectangles added with [`add`](Self::add) may overlap; [`subtract`](Self::subtract) keeps the
/// list free of the removed area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RectList {
    rects: SmallVec<[IntRect; 4]>,
}

impl RectList {
    /// Create an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rectangle to the region. Empty rectangles are ignored.
    pub fn add(&mut self, rect: IntRect) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    /// Remove `hole` from every rectangle in the region.
    ///
    /// Each rectangle overlapping `hole` is replaced by up to four bands around it.
    pub fn subtract(&mut self, hole: IntRect) {
        if hole.is_empty() {
            return;
        }
        let mut result = SmallVec::<[IntRect; 4]>::new();
        for rect in self.rects.drain(..) {
            let overlap = rect.intersection(hole);
            if overlap.is_empty() {
                result.push(rect);
                continue;
            }
            let bands = [
                IntRect::from_edges(rect.x, rect.y, rect.right(), overlap.y),
                IntRect::from_edges(rect.x, overlap.bottom(), rect.right(), rect.bottom()),
                IntRect::from_edges(rect.x, overlap.y, overlap.x, overlap.bottom()),
                IntRect::from_edges(overlap.right(), overlap.y, rect.right(), overlap.bottom()),
            ];
            result.extend(bands.into_iter().filter(|band| !band.is_empty()));
        }
        self.rects = result;
    }

    /// The number of rectangles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Whether the region is empty.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The rectangles making up the region.
    pub fn rects(&self) -> &[IntRect] {
        &self.rects
    }

    /// The smallest rectangle containing the whole region.
    pub fn bounds(&self) -> IntRect {
        self.rects
            .iter()
            .fold(IntRect::default(), |bounds, rect| bounds.union(*rect))
    }

    /// Whether any rectangle in the region contains the pixel at `(x, y)`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rects
            .iter()
            .any(|r| x >= r.x && y >= r.y && x < r.right() && y < r.bottom())
    }
}

impl From<IntRect> for RectList {
    fn from(rect: IntRect) -> Self {
        let mut list = Self::new();
        list.add(rect);
        list
    }
}

impl FromIterator<IntRect> for RectList {
    fn from_iter<I: IntoIterator<Item = IntRect>>(iter: I) -> Self {
        let mut list = Self::new();
        for rect in iter {
            list.add(rect);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::{IntRect, RectList};
    use crate::kurbo::Rect;

    #[test]
    fn intersection_and_union() {
        let a = IntRect::new(0, 0, 10, 10);
        let b = IntRect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(b), IntRect::new(5, 5, 5, 5));
        assert_eq!(a.union(b), IntRect::new(0, 0, 15, 15));
        assert!(a.intersection(IntRect::new(10, 0, 5, 5)).is_empty());
        assert_eq!(IntRect::default().union(b), b);
    }

    #[test]
    fn enclosing_rounds_outwards() {
        let r = IntRect::enclosing(Rect::new(0.5, 1.2, 3.1, 4.0));
        assert_eq!(r, IntRect::new(0, 1, 4, 3));
        assert!(IntRect::enclosing(Rect::new(2.5, 2.5, 2.5, 8.0)).is_empty());
    }

    #[test]
    fn subtract_leaves_a_frame() {
        let mut list = RectList::from(IntRect::new(0, 0, 10, 10));
        list.subtract(IntRect::new(3, 3, 4, 4));

        assert_eq!(list.len(), 4);
        assert_eq!(list.bounds(), IntRect::new(0, 0, 10, 10));
        assert!(list.contains(0, 0));
        assert!(list.contains(9, 9));
        assert!(!list.contains(3, 3));
        assert!(!list.contains(6, 6));
        assert!(list.contains(7, 5));
    }

    #[test]
    fn subtract_everything() {
        let mut list = RectList::from(IntRect::new(2, 2, 4, 4));
        list.subtract(IntRect::new(0, 0, 10, 10));
        assert!(list.is_empty());
        assert!(list.bounds().is_empty());
    }
}
