use super::{Point2, Vector2, TOLERANCE};

/// A finite line segment in the XY plane from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2D {
    from: Point2,
    to: Point2,
}

impl Line2D {
    /// Creates a new line between two points.
    #[must_use]
    pub fn new(from: Point2, to: Point2) -> Self {
        Self { from, to }
    }

    /// Returns the start point.
    #[must_use]
    pub fn from(&self) -> &Point2 {
        &self.from
    }

    /// Returns the end point.
    #[must_use]
    pub fn to(&self) -> &Point2 {
        &self.to
    }

    /// Returns the (non-unit) vector from start to end.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.to - self.from
    }

    /// Returns the length of the line.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Returns the same line running the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// Evaluates the line at parameter `t`.
    #[must_use]
    pub fn evaluate_at(&self, t: f64) -> Point2 {
        self.from + self.direction() * t
    }

    /// Parameter of the point on the infinite line closest to `pt`.
    #[must_use]
    pub fn closest_parameter_infinite(&self, pt: &Point2) -> f64 {
        let d = self.direction();
        let len_sq = d.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return 0.0;
        }
        (pt - self.from).dot(&d) / len_sq
    }

    /// Closest point on the finite segment.
    #[must_use]
    pub fn closest_point(&self, pt: &Point2) -> Point2 {
        self.evaluate_at(self.closest_parameter_infinite(pt).clamp(0.0, 1.0))
    }

    /// Distance from `pt` to the finite segment.
    #[must_use]
    pub fn distance_to_point(&self, pt: &Point2) -> f64 {
        (pt - self.closest_point(pt)).norm()
    }
}
