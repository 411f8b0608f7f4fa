use crate::error::{OperationError, Result};
use crate::math::{Line3D, Point3, Vector3};
use crate::operations::offset::{self, is_closed, OffsetParams, VarDistParallel};

/// An ordered list of 3D points joined by straight segments.
///
/// The polyline is closed when its first and last point coincide (within
/// [`OPEN_TOLERANCE`](crate::operations::offset::OPEN_TOLERANCE)); there is
/// no separate flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline3D {
    points: Vec<Point3>,
}

impl Polyline3D {
    /// Creates a polyline from at least two points.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::TooFewPoints` for fewer than 2 points.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if points.len() < 2 {
            return Err(OperationError::TooFewPoints {
                required: 2,
                found: points.len(),
            }
            .into());
        }
        Ok(Self { points })
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        is_closed(&self.points)
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Iterates the segments as lines.
    pub fn segments(&self) -> impl Iterator<Item = Line3D> + '_ {
        self.points.windows(2).map(|w| Line3D::new(w[0], w[1]))
    }

    /// Total length of all segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    pub fn reverse_in_place(&mut self) {
        self.points.reverse();
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Constant offset using the average normal of the points.
    ///
    /// # Errors
    ///
    /// See [`offset::offset`].
    pub fn offset(&self, dist_in_plane: f64, dist_perpendicular: f64) -> Result<Self> {
        offset::offset(&self.points, dist_in_plane, dist_perpendicular).map(|points| Self { points })
    }

    /// Constant offset with an explicit reference normal.
    ///
    /// # Errors
    ///
    /// See [`offset::offset_with_normal`].
    pub fn offset_with_normal(
        &self,
        ref_normal: &Vector3,
        dist_in_plane: f64,
        dist_perpendicular: f64,
        params: &OffsetParams,
    ) -> Result<Self> {
        offset::offset_with_normal(
            &self.points,
            ref_normal,
            dist_in_plane,
            dist_perpendicular,
            params,
        )
        .map(|points| Self { points })
    }

    /// Offset with one distance pair per segment.
    ///
    /// # Errors
    ///
    /// See [`offset::offset_variable`]. A `Skip` result with fewer than two
    /// points is reported as `OperationError::TooFewPoints`.
    pub fn offset_variable(
        &self,
        ref_normal: Option<&Vector3>,
        dists_in_plane: &[f64],
        dists_perpendicular: &[f64],
        policy: VarDistParallel,
        params: &OffsetParams,
    ) -> Result<Self> {
        let points = offset::offset_variable(
            &self.points,
            ref_normal,
            dists_in_plane,
            dists_perpendicular,
            policy,
            params,
        )?;
        Self::new(points)
    }
}
