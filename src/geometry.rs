//! Integer rectangles and points in pixel space.

/// A point in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle anchored at the origin.
    #[must_use]
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if a point is inside this rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Return a copy moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    /// Compute intersection with another rectangle.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, (x2 - x1) as u32, (y2 - y1) as u32))
        } else {
            None
        }
    }

    /// Check if this rectangle is empty (zero area).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains(Point::new(10, 10)));
        assert!(rect.contains(Point::new(29, 29)));
        assert!(!rect.contains(Point::new(30, 30)));
        assert!(!rect.contains(Point::new(9, 10)));
    }

    #[test]
    fn test_rect_empty_contains_nothing() {
        let rect = Rect::new(5, 5, 0, 10);
        assert!(rect.is_empty());
        assert!(!rect.contains(Point::new(5, 5)));
    }

    #[test]
    fn test_rect_contains_rect() {
        let outer = Rect::sized(100, 20);
        assert!(outer.contains_rect(&Rect::new(0, 0, 100, 20)));
        assert!(outer.contains_rect(&Rect::new(40, 5, 10, 15)));
        assert!(!outer.contains_rect(&Rect::new(95, 0, 10, 5)));
        assert!(!outer.contains_rect(&Rect::new(-1, 0, 10, 5)));
    }

    #[test]
    fn test_rect_translated() {
        let r = Rect::new(1, 2, 3, 4).translated(10, -2);
        assert_eq!(r, Rect::new(11, 0, 3, 4));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::sized(20, 20);
        let b = Rect::new(10, 10, 20, 20);
        assert_eq!(a.intersect(&b), Some(Rect::new(10, 10, 10, 10)));
        assert_eq!(a.intersect(&Rect::new(20, 0, 5, 5)), None);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(-5, 3, 10, 7);
        assert_eq!(r.right(), 5);
        assert_eq!(r.bottom(), 10);
        assert_eq!(r.origin(), Point::new(-5, 3));
    }
}
