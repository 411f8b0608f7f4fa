use super::Point2;

/// An axis-aligned bounding rectangle in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BRect {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl BRect {
    /// Creates the smallest rectangle containing both points.
    #[must_use]
    pub fn from_points(a: &Point2, b: &Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Returns the rectangle grown by `dist` on every side.
    #[must_use]
    pub fn expand(&self, dist: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - dist, self.min.y - dist),
            max: Point2::new(self.max.x + dist, self.max.y + dist),
        }
    }

    /// Grows the rectangle in place so it contains `pt`.
    pub fn include(&mut self, pt: &Point2) {
        self.min.x = self.min.x.min(pt.x);
        self.min.y = self.min.y.min(pt.y);
        self.max.x = self.max.x.max(pt.x);
        self.max.y = self.max.y.max(pt.y);
    }

    /// Returns `true` if `pt` lies inside or on the border.
    #[must_use]
    pub fn contains(&self, pt: &Point2) -> bool {
        pt.x >= self.min.x && pt.x <= self.max.x && pt.y >= self.min.y && pt.y <= self.max.y
    }

    /// Returns `true` if the two rectangles overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Width along X.
    #[must_use]
    pub fn size_x(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height along Y.
    #[must_use]
    pub fn size_y(&self) -> f64 {
        self.max.y - self.min.y
    }
}
