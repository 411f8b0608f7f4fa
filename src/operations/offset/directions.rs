use crate::error::{GeometryError, OperationError, Result, TopologyError};
use crate::math::cosine::to_degrees;
use crate::math::{unitize_3d, Point3, UnitVector3, Vector3, TOLERANCE};

/// Points closer than this are coincident for offsetting. A polyline whose
/// first and last points are this close is treated as closed.
pub const OPEN_TOLERANCE: f64 = 1e-6;

/// Local offset plane at one polyline vertex.
///
/// `prev_in_plane` and `next_in_plane` are perpendicular to the incoming
/// and outgoing segment and lie in the plane spanned by both segments.
/// `perp_dir` is the normal of that plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetDirection {
    pub prev_in_plane: UnitVector3,
    pub next_in_plane: UnitVector3,
    pub perp_dir: UnitVector3,
}

impl OffsetDirection {
    /// Direction for a vertex with a single adjacent segment, such as the
    /// end of an open polyline. `perp` only needs to be roughly
    /// perpendicular to `tangent`; it is re-orthogonalized here.
    fn one_sided(perp: &Vector3, tangent: &Vector3) -> Result<Self> {
        let in_plane = unitize_3d(perp.cross(tangent)).map_err(|_| {
            GeometryError::Degenerate("offset plane normal is parallel to the polyline".to_owned())
        })?;
        let perp_dir = unitize_3d(tangent.cross(&in_plane.into_inner()))?;
        Ok(Self {
            prev_in_plane: in_plane,
            next_in_plane: in_plane,
            perp_dir,
        })
    }
}

/// Returns `true` if the first and last point coincide.
#[must_use]
pub fn is_closed(points: &[Point3]) -> bool {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) if points.len() > 2 => {
            (a - b).norm_squared() < OPEN_TOLERANCE * OPEN_TOLERANCE
        }
        _ => false,
    }
}

/// Unit tangent of every segment.
///
/// # Errors
///
/// - `OperationError::TooFewPoints` for fewer than 2 points
/// - `GeometryError::CoincidentPoints` if two consecutive points are closer
///   than [`OPEN_TOLERANCE`]
pub fn get_segment_unit_vectors(points: &[Point3]) -> Result<Vec<UnitVector3>> {
    if points.len() < 2 {
        return Err(OperationError::TooFewPoints {
            required: 2,
            found: points.len(),
        }
        .into());
    }
    points
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let d = w[1] - w[0];
            UnitVector3::try_new(d, OPEN_TOLERANCE).ok_or_else(|| {
                GeometryError::CoincidentPoints {
                    index: i,
                    distance: d.norm(),
                }
                .into()
            })
        })
        .collect()
}

/// Computes the local offset plane at every vertex.
///
/// The result has one entry per point (`unit_tangents.len() + 1`). Vertices
/// whose segments turn less than `colinear_cosine` allows are `None` and
/// must be resolved from their neighbours after offsetting.
///
/// The plane normal of each corner is flipped to agree with the previous
/// corner (the first corner agrees with `ref_normal`), so the offset side
/// stays consistent along a curving 3D polyline.
///
/// # Errors
///
/// - `GeometryError::ZeroVector` if `ref_normal` has zero length
/// - `TopologyError::UTurn` if a vertex turns more sharply than
///   `u_turn_cosine` allows
/// - `GeometryError::Degenerate` if the polyline is straight and
///   parallel to `ref_normal`
pub fn get_offset_directions(
    unit_tangents: &[UnitVector3],
    ref_normal: &Vector3,
    is_open: bool,
    colinear_cosine: f64,
    u_turn_cosine: f64,
) -> Result<Vec<Option<OffsetDirection>>> {
    let seg_count = unit_tangents.len();
    if seg_count == 0 {
        return Err(OperationError::TooFewPoints {
            required: 2,
            found: 1,
        }
        .into());
    }
    let mut last_perp = unitize_3d(*ref_normal)?.into_inner();
    let mut dirs: Vec<Option<OffsetDirection>> = vec![None; seg_count + 1];

    let first_vertex = usize::from(is_open);
    for (i, slot) in dirs.iter_mut().enumerate().take(seg_count).skip(first_vertex) {
        let prev = unit_tangents[(i + seg_count - 1) % seg_count].into_inner();
        let next = unit_tangents[i].into_inner();
        let dot = prev.dot(&next);
        if dot < u_turn_cosine {
            return Err(TopologyError::UTurn {
                index: i,
                angle_degrees: to_degrees(dot),
            }
            .into());
        }
        if dot > colinear_cosine {
            continue;
        }
        let Some(perp) = UnitVector3::try_new(prev.cross(&next), TOLERANCE) else {
            continue;
        };
        let mut perp = perp.into_inner();
        if perp.dot(&last_perp) < 0.0 {
            perp = -perp;
        }
        last_perp = perp;
        // perp is orthogonal to both tangents, so the cross products are unit length.
        *slot = Some(OffsetDirection {
            prev_in_plane: UnitVector3::new_unchecked(perp.cross(&prev)),
            next_in_plane: UnitVector3::new_unchecked(perp.cross(&next)),
            perp_dir: UnitVector3::new_unchecked(perp),
        });
    }

    let first_corner = dirs.iter().flatten().next().copied();
    let last_corner = dirs.iter().rev().flatten().next().copied();
    match (first_corner, last_corner) {
        (Some(first), Some(last)) => {
            if is_open {
                dirs[0] = Some(OffsetDirection::one_sided(
                    &first.perp_dir,
                    &unit_tangents[0],
                )?);
                dirs[seg_count] = Some(OffsetDirection::one_sided(
                    &last.perp_dir,
                    &unit_tangents[seg_count - 1],
                )?);
            } else {
                dirs[seg_count] = dirs[0];
            }
        }
        _ => {
            // Straight polyline: one plane for every vertex.
            let t0 = unit_tangents[0].into_inner();
            let normal = unitize_3d(*ref_normal)?;
            let uniform = OffsetDirection::one_sided(&normal, &t0)?;
            tracing::debug!("straight polyline, using a single offset plane");
            dirs.fill(Some(uniform));
        }
    }
    Ok(dirs)
}

/// Approximate normal of a point sequence, used as a reference normal when
/// the caller does not supply one.
///
/// Sums the cross products of consecutive centroid-relative points, wrapping
/// around from the last point to the first. For a planar counter-clockwise
/// loop in XY this is `+Z`.
///
/// # Errors
///
/// - `OperationError::TooFewPoints` for fewer than 3 points
/// - `GeometryError::Degenerate` if the points are colinear
pub fn average_normal(points: &[Point3]) -> Result<UnitVector3> {
    let pts = if is_closed(points) {
        &points[..points.len() - 1]
    } else {
        points
    };
    let n = pts.len();
    if n < 3 {
        return Err(OperationError::TooFewPoints {
            required: 3,
            found: n,
        }
        .into());
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / n as f64;
    let centroid = pts
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        * scale;

    let mut sum = Vector3::zeros();
    for i in 0..n {
        let a = pts[i].coords - centroid;
        let b = pts[(i + 1) % n].coords - centroid;
        sum += a.cross(&b);
    }
    UnitVector3::try_new(sum, TOLERANCE).ok_or_else(|| {
        GeometryError::Degenerate("points are colinear, no average normal".to_owned()).into()
    })
}
