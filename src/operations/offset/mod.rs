//! Offsetting of open and closed 3D polylines.
//!
//! Every vertex gets a local plane from its two adjacent segments. The
//! in-plane distance moves the vertex within that plane (positive is to the
//! left when looking down the reference normal), the perpendicular distance
//! moves it along the plane normal. Vertices whose segments are colinear
//! have no plane of their own and are placed from their neighbours in a
//! second pass.

mod colinear;
mod corner;
mod directions;

pub use colinear::{get_colinear_neighbors, ColinearPnt};
pub use corner::{
    offset_constant_with_directions, offset_variable_with_directions, set_off_corner,
    set_off_corner_var, VariableDistances,
};
pub use directions::{
    average_normal, get_offset_directions, get_segment_unit_vectors, is_closed, OffsetDirection,
    OPEN_TOLERANCE,
};

use crate::error::Result;
use crate::math::cosine::{COS_175, COS_2_5};
use crate::math::{Point3, Vector3};

/// How a variable offset treats a colinear vertex between two segments
/// with different distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarDistParallel {
    /// Return `OperationError::AmbiguousOffset`.
    Fail,
    /// Leave the vertex out of the result.
    Skip,
    /// Place it at the same relative position along the offset neighbours
    /// as it has along the input polyline.
    Proportional,
    /// Project the input vertex onto the line between the offset
    /// neighbours. Can produce self-intersecting output.
    Project,
}

/// Angle thresholds of the offset engine.
#[derive(Debug, Clone, Copy)]
pub struct OffsetParams {
    /// Vertices whose segment tangents have a larger dot product than this
    /// are treated as colinear.
    pub colinear_cosine: f64,
    /// Vertices whose segment tangents have a smaller dot product than this
    /// are rejected as U-turns.
    pub u_turn_cosine: f64,
}

impl Default for OffsetParams {
    fn default() -> Self {
        Self {
            colinear_cosine: COS_2_5,
            u_turn_cosine: COS_175,
        }
    }
}

/// Offsets a polyline by constant distances, using [`average_normal`] as the
/// reference normal.
///
/// # Errors
///
/// Fails if the points are colinear (no average normal) and for every
/// reason listed on [`offset_with_normal`].
pub fn offset(points: &[Point3], dist_in_plane: f64, dist_perpendicular: f64) -> Result<Vec<Point3>> {
    let normal = average_normal(points)?;
    offset_with_normal(
        points,
        &normal,
        dist_in_plane,
        dist_perpendicular,
        &OffsetParams::default(),
    )
}

/// Offsets a polyline by constant distances with an explicit reference
/// normal.
///
/// A polyline whose first and last point coincide is offset as a closed
/// ring and the result is closed too.
///
/// # Errors
///
/// - `OperationError::TooFewPoints` for fewer than 2 points
/// - `GeometryError::CoincidentPoints` for consecutive duplicate points
/// - `GeometryError::ZeroVector` for a zero `ref_normal`
/// - `TopologyError::UTurn` if a vertex turns back sharper than
///   `params.u_turn_cosine` allows
pub fn offset_with_normal(
    points: &[Point3],
    ref_normal: &Vector3,
    dist_in_plane: f64,
    dist_perpendicular: f64,
    params: &OffsetParams,
) -> Result<Vec<Point3>> {
    let tangents = get_segment_unit_vectors(points)?;
    let is_open = !is_closed(points);
    let dirs = get_offset_directions(
        &tangents,
        ref_normal,
        is_open,
        params.colinear_cosine,
        params.u_turn_cosine,
    )?;
    offset_constant_with_directions(points, &dirs, is_open, dist_in_plane, dist_perpendicular)
}

/// Offsets a polyline with a separate distance per segment.
///
/// `dists_in_plane` and `dists_perpendicular` hold one value per segment.
/// At a corner the perpendicular distance is the mean of the two adjacent
/// segments. Without `ref_normal`, [`average_normal`] is used.
///
/// # Errors
///
/// - `OperationError::LengthMismatch` if a distance slice does not match
///   the segment count
/// - `OperationError::AmbiguousOffset` for colinear vertices with differing
///   distances under [`VarDistParallel::Fail`]
/// - every reason listed on [`offset_with_normal`]
pub fn offset_variable(
    points: &[Point3],
    ref_normal: Option<&Vector3>,
    dists_in_plane: &[f64],
    dists_perpendicular: &[f64],
    policy: VarDistParallel,
    params: &OffsetParams,
) -> Result<Vec<Point3>> {
    let tangents = get_segment_unit_vectors(points)?;
    let is_open = !is_closed(points);
    let normal = match ref_normal {
        Some(n) => *n,
        None => average_normal(points)?.into_inner(),
    };
    let dirs = get_offset_directions(
        &tangents,
        &normal,
        is_open,
        params.colinear_cosine,
        params.u_turn_cosine,
    )?;
    offset_variable_with_directions(
        points,
        &tangents,
        &dirs,
        is_open,
        &VariableDistances {
            in_plane: dists_in_plane,
            perpendicular: dists_perpendicular,
        },
        params.colinear_cosine,
        policy,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeoloopError, OperationError, TopologyError};
    use crate::math::Line3D;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    fn pts(coords: &[(f64, f64, f64)]) -> Vec<Point3> {
        coords.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect()
    }

    fn straight() -> Vec<Point3> {
        pts(&[(0.0, 0.0, 0.0), (5.0, 0.0, 0.0), (10.0, 0.0, 0.0)])
    }

    fn regular_polygon(n: u32, radius: f64) -> Vec<Point3> {
        let mut v: Vec<Point3> = (0..n)
            .map(|i| {
                let a = TAU * f64::from(i) / f64::from(n);
                Point3::new(radius * a.cos(), radius * a.sin(), 0.0)
            })
            .collect();
        v.push(v[0]);
        v
    }

    #[test]
    fn closed_square_inward() {
        let square = pts(&[
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 0.0),
            (10.0, 10.0, 0.0),
            (0.0, 10.0, 0.0),
            (0.0, 0.0, 0.0),
        ]);
        let res = offset(&square, 1.0, 0.0).unwrap();
        let expected = pts(&[
            (1.0, 1.0, 0.0),
            (9.0, 1.0, 0.0),
            (9.0, 9.0, 0.0),
            (1.0, 9.0, 0.0),
            (1.0, 1.0, 0.0),
        ]);
        assert_eq!(res.len(), expected.len());
        for (a, b) in res.iter().zip(&expected) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn perpendicular_distance_lifts_points() {
        let square = pts(&[
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 0.0),
            (10.0, 10.0, 0.0),
            (0.0, 10.0, 0.0),
            (0.0, 0.0, 0.0),
        ]);
        let res = offset_with_normal(&square, &Vector3::z(), 0.0, 2.0, &OffsetParams::default())
            .unwrap();
        for (a, b) in res.iter().zip(&square) {
            assert_relative_eq!(a.z - b.z, 2.0, epsilon = 1e-12);
            assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        }
    }

    #[test]
    fn inward_then_outward_returns_to_polygon() {
        let hexagon = regular_polygon(6, 10.0);
        let inner =
            offset_with_normal(&hexagon, &Vector3::z(), 1.5, 0.0, &OffsetParams::default()).unwrap();
        let back =
            offset_with_normal(&inner, &Vector3::z(), -1.5, 0.0, &OffsetParams::default()).unwrap();
        assert_eq!(back.len(), hexagon.len());
        for (a, b) in back.iter().zip(&hexagon) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn straight_polyline_middle_point_on_offset_line() {
        let line = straight();
        let res = offset_with_normal(&line, &Vector3::z(), 1.0, 0.0, &OffsetParams::default())
            .unwrap();
        assert_eq!(res.len(), 3);
        assert_relative_eq!(res[1], Point3::new(5.0, 1.0, 0.0), epsilon = 1e-12);
        let offset_line = Line3D::new(res[0], res[2]);
        assert!(offset_line.distance_to_point(&res[1]) < 1e-12);
        assert!((res[1] - line[1]).norm() > 0.5);
    }

    #[test]
    fn colinear_vertex_between_corners_is_repaired() {
        let line = pts(&[
            (0.0, 0.0, 0.0),
            (5.0, 0.0, 0.0),
            (10.0, 0.0, 0.0),
            (10.0, 10.0, 0.0),
        ]);
        let res = offset_with_normal(&line, &Vector3::z(), 1.0, 0.0, &OffsetParams::default())
            .unwrap();
        assert_relative_eq!(res[0], Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[1], Point3::new(5.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[2], Point3::new(9.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[3], Point3::new(9.0, 10.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn nearly_colinear_vertex_is_projected() {
        let line = pts(&[
            (0.0, 0.0, 0.0),
            (5.0, 0.01, 0.0),
            (10.0, 0.0, 0.0),
            (10.0, 10.0, 0.0),
        ]);
        let res = offset_with_normal(&line, &Vector3::z(), 1.0, 0.0, &OffsetParams::default())
            .unwrap();
        let offset_line = Line3D::new(res[0], res[2]);
        assert!(offset_line.distance_to_point(&res[1]) < 1e-12);
    }

    #[test]
    fn straight_polyline_without_normal_fails() {
        assert!(offset(&straight(), 1.0, 0.0).is_err());
    }

    #[test]
    fn sharp_u_turn_fails() {
        let line = pts(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (0.0, 0.5, 0.0)]);
        let result = offset_with_normal(&line, &Vector3::z(), 1.0, 0.0, &OffsetParams::default());
        assert!(matches!(
            result,
            Err(GeoloopError::Topology(TopologyError::UTurn { .. }))
        ));
    }

    #[test]
    fn three_d_polyline_keeps_side() {
        // A helix-like zig-zag: every corner plane is different, but the
        // offset side must not flip between consecutive corners.
        let line = pts(&[
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 1.0),
            (10.0, 10.0, 2.0),
            (0.0, 10.0, 3.0),
            (0.0, 0.0, 4.0),
        ]);
        let tangents = get_segment_unit_vectors(&line).unwrap();
        let dirs = get_offset_directions(&tangents, &Vector3::z(), true, COS_2_5, COS_175).unwrap();
        let perps: Vec<Vector3> = dirs.iter().flatten().map(|d| d.perp_dir.into_inner()).collect();
        for w in perps.windows(2) {
            assert!(w[0].dot(&w[1]) > 0.0);
        }
        let res = offset_with_normal(&line, &Vector3::z(), 1.0, 0.0, &OffsetParams::default())
            .unwrap();
        // Offsetting to the left of a counter-clockwise spiral moves inwards.
        assert!(res[1].x < 10.0 && res[1].y > 0.0);
    }

    #[test]
    fn variable_straight_fail_policy() {
        let result = offset_variable(
            &straight(),
            Some(&Vector3::z()),
            &[1.0, 2.0],
            &[0.0, 0.0],
            VarDistParallel::Fail,
            &OffsetParams::default(),
        );
        assert!(matches!(
            result,
            Err(GeoloopError::Operation(OperationError::AmbiguousOffset { index: 1, .. }))
        ));
    }

    #[test]
    fn variable_straight_skip_policy() {
        let res = offset_variable(
            &straight(),
            Some(&Vector3::z()),
            &[1.0, 2.0],
            &[0.0, 0.0],
            VarDistParallel::Skip,
            &OffsetParams::default(),
        )
        .unwrap();
        assert_eq!(res.len(), 2);
        assert_relative_eq!(res[0], Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[1], Point3::new(10.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn variable_straight_proportional_policy() {
        let res = offset_variable(
            &straight(),
            Some(&Vector3::z()),
            &[1.0, 2.0],
            &[0.0, 0.0],
            VarDistParallel::Proportional,
            &OffsetParams::default(),
        )
        .unwrap();
        assert_eq!(res.len(), 3);
        assert_relative_eq!(res[1], Point3::new(5.0, 1.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn variable_straight_project_policy() {
        let res = offset_variable(
            &straight(),
            Some(&Vector3::z()),
            &[1.0, 2.0],
            &[0.0, 0.0],
            VarDistParallel::Project,
            &OffsetParams::default(),
        )
        .unwrap();
        assert_eq!(res.len(), 3);
        let offset_line = Line3D::new(res[0], res[2]);
        assert!(offset_line.distance_to_point(&res[1]) < 1e-12);
    }

    #[test]
    fn variable_equal_distances_match_constant() {
        let line = pts(&[
            (0.0, 0.0, 0.0),
            (5.0, 0.0, 0.0),
            (10.0, 0.0, 0.0),
            (10.0, 10.0, 0.0),
        ]);
        let var = offset_variable(
            &line,
            Some(&Vector3::z()),
            &[1.0, 1.0, 1.0],
            &[0.0, 0.0, 0.0],
            VarDistParallel::Fail,
            &OffsetParams::default(),
        )
        .unwrap();
        let constant =
            offset_with_normal(&line, &Vector3::z(), 1.0, 0.0, &OffsetParams::default()).unwrap();
        assert_eq!(var.len(), constant.len());
        for (a, b) in var.iter().zip(&constant) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn variable_corner_distances() {
        let line = pts(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0)]);
        let res = offset_variable(
            &line,
            Some(&Vector3::z()),
            &[1.0, 2.0],
            &[0.0, 0.0],
            VarDistParallel::Fail,
            &OffsetParams::default(),
        )
        .unwrap();
        assert_relative_eq!(res[0], Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[1], Point3::new(8.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[2], Point3::new(8.0, 10.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn variable_closed_square() {
        let square = pts(&[
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 0.0),
            (10.0, 10.0, 0.0),
            (0.0, 10.0, 0.0),
            (0.0, 0.0, 0.0),
        ]);
        let res = offset_variable(
            &square,
            None,
            &[1.0, 2.0, 1.0, 2.0],
            &[0.0; 4],
            VarDistParallel::Fail,
            &OffsetParams::default(),
        )
        .unwrap();
        assert_eq!(res.len(), 5);
        assert_relative_eq!(res[0], Point3::new(2.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[1], Point3::new(8.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[2], Point3::new(8.0, 9.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(res[3], Point3::new(2.0, 9.0, 0.0), epsilon = 1e-12);
        assert_eq!(res[0], res[4]);
    }

    #[test]
    fn variable_length_mismatch_fails() {
        let result = offset_variable(
            &straight(),
            Some(&Vector3::z()),
            &[1.0],
            &[0.0, 0.0],
            VarDistParallel::Fail,
            &OffsetParams::default(),
        );
        assert!(matches!(
            result,
            Err(GeoloopError::Operation(OperationError::LengthMismatch { .. }))
        ));
    }
}
