use super::{Point3, Vector3, TOLERANCE};

/// A finite line segment in 3D space from `from` to `to`.
///
/// The parametric form is `P(t) = from + t * (to - from)` with `t` in
/// `[0, 1]` on the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3D {
    from: Point3,
    to: Point3,
}

impl Line3D {
    /// Creates a new line between two points.
    #[must_use]
    pub fn new(from: Point3, to: Point3) -> Self {
        Self { from, to }
    }

    /// Returns the start point.
    #[must_use]
    pub fn from(&self) -> &Point3 {
        &self.from
    }

    /// Returns the end point.
    #[must_use]
    pub fn to(&self) -> &Point3 {
        &self.to
    }

    /// Returns the (non-unit) vector from start to end.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
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

    /// Evaluates the line at parameter `t`. Values outside `[0, 1]`
    /// extrapolate along the infinite line.
    #[must_use]
    pub fn evaluate_at(&self, t: f64) -> Point3 {
        self.from + self.direction() * t
    }

    /// Parameter of the point on the infinite line closest to `pt`.
    ///
    /// Returns `0.0` for a zero-length line.
    #[must_use]
    pub fn closest_parameter_infinite(&self, pt: &Point3) -> f64 {
        let d = self.direction();
        let len_sq = d.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return 0.0;
        }
        (pt - self.from).dot(&d) / len_sq
    }

    /// Closest point on the infinite line through this segment.
    #[must_use]
    pub fn closest_point_infinite(&self, pt: &Point3) -> Point3 {
        self.evaluate_at(self.closest_parameter_infinite(pt))
    }

    /// Closest point on the finite segment.
    #[must_use]
    pub fn closest_point(&self, pt: &Point3) -> Point3 {
        self.evaluate_at(self.closest_parameter_infinite(pt).clamp(0.0, 1.0))
    }

    /// Distance from `pt` to the finite segment.
    #[must_use]
    pub fn distance_to_point(&self, pt: &Point3) -> f64 {
        (pt - self.closest_point(pt)).norm()
    }
}
