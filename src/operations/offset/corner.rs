use crate::error::{OperationError, Result};
use crate::math::{Line3D, Point3, UnitVector3, Vector3, TOLERANCE};

use super::colinear::get_colinear_neighbors;
use super::directions::OffsetDirection;
use super::VarDistParallel;

/// Offsets one corner by the same in-plane distance on both sides.
///
/// `(prev + next) * d / (1 + cos)` is the intersection of both segments'
/// offset lines.
#[must_use]
pub fn set_off_corner(
    pt: &Point3,
    dir: &OffsetDirection,
    dist_in_plane: f64,
    dist_perpendicular: f64,
) -> Point3 {
    let a = dir.prev_in_plane.into_inner();
    let b = dir.next_in_plane.into_inner();
    let cosine = a.dot(&b);
    pt + (a + b) * (dist_in_plane / (1.0 + cosine)) + dir.perp_dir.into_inner() * dist_perpendicular
}

/// Offsets one corner where the incoming and outgoing segments use
/// different in-plane distances.
///
/// Starts from the miter point for `dist_next` and slides it along the
/// next segment until it also lies `dist_prev` away from the previous one.
#[must_use]
pub fn set_off_corner_var(
    pt: &Point3,
    dir: &OffsetDirection,
    next_tangent: &Vector3,
    dist_prev: f64,
    dist_next: f64,
    dist_perpendicular: f64,
) -> Point3 {
    let base = set_off_corner(pt, dir, dist_next, dist_perpendicular);
    let along = dir.prev_in_plane.dot(next_tangent);
    if along.abs() < TOLERANCE {
        return base;
    }
    base + next_tangent * ((dist_prev - dist_next) / along)
}

/// Offsets every vertex by a constant distance.
///
/// Vertices with an offset plane use the miter formula. The others are
/// then projected onto the line through the offset points of their nearest
/// resolved neighbours.
///
/// # Errors
///
/// - `OperationError::LengthMismatch` if `dirs` and `points` differ in length
/// - `GeometryError::Degenerate` if an unresolved vertex has no resolved
///   neighbour
pub fn offset_constant_with_directions(
    points: &[Point3],
    dirs: &[Option<OffsetDirection>],
    is_open: bool,
    dist_in_plane: f64,
    dist_perpendicular: f64,
) -> Result<Vec<Point3>> {
    if dirs.len() != points.len() {
        return Err(OperationError::LengthMismatch {
            expected: points.len(),
            found: dirs.len(),
        }
        .into());
    }

    let mut res: Vec<Point3> = points
        .iter()
        .zip(dirs)
        .map(|(pt, dir)| match dir {
            Some(d) => set_off_corner(pt, d, dist_in_plane, dist_perpendicular),
            None => *pt,
        })
        .collect();

    let resolved: Vec<bool> = dirs.iter().map(Option::is_some).collect();
    let colinear = get_colinear_neighbors(&resolved, is_open)?;
    for c in &colinear {
        let line = Line3D::new(res[c.prev_ok], res[c.next_ok]);
        res[c.idx] = line.closest_point_infinite(&points[c.idx]);
    }
    if !colinear.is_empty() {
        tracing::debug!(count = colinear.len(), "projected colinear points onto offset lines");
    }

    if !is_open {
        if let Some(&first) = res.first() {
            let last = res.len() - 1;
            res[last] = first;
        }
    }
    Ok(res)
}

/// What to do with one vertex in the first pass of a variable offset.
enum Pending {
    Done(Point3),
    Project,
    Proportional,
    Skip,
}

/// Per-segment inputs of a variable-distance offset.
pub struct VariableDistances<'a> {
    pub in_plane: &'a [f64],
    pub perpendicular: &'a [f64],
}

/// Offsets every vertex with per-segment distances.
///
/// Corners use [`set_off_corner_var`]. A colinear vertex between two
/// segments with the same distance is projected like in a constant offset.
/// When the distances differ the offset position is ambiguous and `policy`
/// decides.
///
/// # Errors
///
/// - `OperationError::LengthMismatch` if a distance slice does not have one
///   entry per segment, or `dirs` not one per point
/// - `OperationError::AmbiguousOffset` under [`VarDistParallel::Fail`]
/// - `GeometryError::Degenerate` if an unresolved vertex has no resolved
///   neighbour
pub fn offset_variable_with_directions(
    points: &[Point3],
    unit_tangents: &[UnitVector3],
    dirs: &[Option<OffsetDirection>],
    is_open: bool,
    distances: &VariableDistances<'_>,
    colinear_cosine: f64,
    policy: VarDistParallel,
) -> Result<Vec<Point3>> {
    let seg_count = unit_tangents.len();
    for found in [distances.in_plane.len(), distances.perpendicular.len()] {
        if found != seg_count {
            return Err(OperationError::LengthMismatch {
                expected: seg_count,
                found,
            }
            .into());
        }
    }
    if dirs.len() != points.len() || points.len() != seg_count + 1 {
        return Err(OperationError::LengthMismatch {
            expected: points.len(),
            found: dirs.len(),
        }
        .into());
    }

    let dists = distances.in_plane;
    let perps = distances.perpendicular;
    let ring = if is_open { points.len() } else { seg_count };

    let mut pending: Vec<Pending> = Vec::with_capacity(ring);
    for i in 0..ring {
        let (prev_seg, next_seg) = adjacent_segments(i, seg_count, is_open);
        let pt = &points[i];
        let step = match (prev_seg, next_seg, dirs[i].as_ref()) {
            (None, Some(s), Some(d)) | (Some(s), None, Some(d)) => {
                Pending::Done(set_off_corner(pt, d, dists[s], perps[s]))
            }
            (Some(p), Some(q), dir) => {
                let perp = 0.5 * (perps[p] + perps[q]);
                let dot = unit_tangents[p].dot(&unit_tangents[q].into_inner());
                let same_dist = (dists[p] - dists[q]).abs() < TOLERANCE;
                match dir {
                    Some(d) if dot <= colinear_cosine => Pending::Done(set_off_corner_var(
                        pt,
                        d,
                        &unit_tangents[q],
                        dists[p],
                        dists[q],
                        perp,
                    )),
                    Some(d) if same_dist => Pending::Done(set_off_corner(pt, d, dists[q], perp)),
                    None if same_dist => Pending::Project,
                    _ => match policy {
                        VarDistParallel::Fail => {
                            return Err(OperationError::AmbiguousOffset {
                                index: i,
                                prev_distance: dists[p],
                                next_distance: dists[q],
                            }
                            .into())
                        }
                        VarDistParallel::Skip => Pending::Skip,
                        VarDistParallel::Proportional => Pending::Proportional,
                        VarDistParallel::Project => Pending::Project,
                    },
                }
            }
            _ => Pending::Project,
        };
        pending.push(step);
    }

    // Second pass: fill in from resolved neighbours.
    let mut resolved: Vec<bool> = pending.iter().map(|p| matches!(p, Pending::Done(_))).collect();
    if !is_open {
        resolved.push(resolved[0]);
    }
    let colinear = get_colinear_neighbors(&resolved, is_open)?;

    let mut res: Vec<Option<Point3>> = pending
        .iter()
        .map(|p| match p {
            Pending::Done(pt) => Some(*pt),
            _ => None,
        })
        .collect();

    for c in &colinear {
        let (Some(a), Some(b)) = (res[c.prev_ok], res[c.next_ok]) else {
            continue;
        };
        res[c.idx] = match pending[c.idx] {
            Pending::Project => Some(Line3D::new(a, b).closest_point_infinite(&points[c.idx])),
            Pending::Proportional => {
                let f = arc_fraction(points, c.prev_ok, c.idx, c.next_ok, ring);
                Some(a + (b - a) * f)
            }
            Pending::Skip | Pending::Done(_) => None,
        };
    }

    let skipped = pending.iter().filter(|p| matches!(p, Pending::Skip)).count();
    if skipped > 0 {
        tracing::debug!(skipped, "dropped colinear points with differing offset distances");
    }

    let mut out: Vec<Point3> = res.into_iter().flatten().collect();
    if !is_open {
        if let Some(&first) = out.first() {
            out.push(first);
        }
    }
    Ok(out)
}

/// Segments before and after vertex `i`; `None` at the ends of an open
/// polyline.
fn adjacent_segments(i: usize, seg_count: usize, is_open: bool) -> (Option<usize>, Option<usize>) {
    if is_open {
        let prev = i.checked_sub(1);
        let next = (i < seg_count).then_some(i);
        (prev, next)
    } else {
        (Some((i + seg_count - 1) % seg_count), Some(i))
    }
}

/// Position of vertex `idx` between `from` and `to`, as a fraction of the
/// input polyline length between them. Walks forward, wrapping at `ring`
/// (the number of distinct vertices).
fn arc_fraction(points: &[Point3], from: usize, idx: usize, to: usize, ring: usize) -> f64 {
    let seg_len = |k: usize| (points[k + 1] - points[k]).norm();
    let mut before = 0.0;
    let mut total = 0.0;
    let mut k = from;
    while k != to {
        total += seg_len(k);
        k = (k + 1) % ring;
        if k == idx {
            before = total;
        }
    }
    if total < TOLERANCE {
        0.5
    } else {
        before / total
    }
}
